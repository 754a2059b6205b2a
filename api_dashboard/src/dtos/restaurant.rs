use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateRestaurantRequest {
    pub name: String,
    /// Defaults to the e-mail of the signed-in account.
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub plan_id: String,
}
