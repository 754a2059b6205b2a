use actix_web::web;

pub mod ledger;

pub mod routes {
    pub mod billing;
    pub mod bot;
    pub mod menu;
    pub mod order;
    pub mod payment;
    pub mod restaurant;
}

mod services {
    pub(crate) mod bot;
    pub(crate) mod menu;
    pub(crate) mod order;
    pub(crate) mod payment;
    pub(crate) mod restaurant;
}

mod dtos {
    pub(crate) mod bot;
    pub(crate) mod menu;
    pub(crate) mod order;
    pub(crate) mod payment;
    pub(crate) mod restaurant;
}

/// Routes used by the restaurant console. Callers wrap the scope with the
/// auth middleware.
pub fn mount_dashboard() -> actix_web::Scope {
    web::scope("/dashboard")
        .app_data(common::http::json_config())
        .service(routes::restaurant::post_restaurant)
        .service(routes::restaurant::get_session)
        .service(routes::billing::get_plans)
        .service(routes::billing::put_plan)
        .service(routes::billing::get_subscriptions)
        .service(routes::bot::post_bot)
        .service(routes::bot::get_bot)
        .service(routes::bot::patch_bot)
        .service(routes::bot::delete_bot)
        .service(routes::menu::get_menu)
        .service(routes::menu::put_category_order)
        .service(routes::menu::put_item_order)
        .service(routes::menu::post_category)
        .service(routes::menu::put_category)
        .service(routes::menu::delete_category)
        .service(routes::menu::post_item)
        .service(routes::menu::delete_item)
        .service(routes::payment::get_payments)
        .service(routes::payment::post_subscription_payment)
        .service(routes::payment::post_refund)
        .service(routes::order::get_orders)
        .service(routes::order::get_order)
        .service(routes::order::post_pay_order)
}
