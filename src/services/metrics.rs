use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

lazy_static! {
    pub static ref SIGNUPS_COUNTER: CounterVec = register_counter_vec!(
        "api_signups_total",
        "Signup attempts by status",
        &["status"]
    ).unwrap();

    pub static ref SIGNINS_COUNTER: CounterVec = register_counter_vec!(
        "api_signins_total",
        "Signin attempts by status",
        &["status"]
    ).unwrap();

    /// `outcome` is `authenticated`, `renewed` or the rejection reason.
    pub static ref AUTHORIZATIONS_COUNTER: CounterVec = register_counter_vec!(
        "api_authorizations_total",
        "Bearer authorization attempts on protected routes",
        &["outcome"]
    ).unwrap();

    pub static ref POST_CACHE_COUNTER: CounterVec = register_counter_vec!(
        "api_post_cache_lookups_total",
        "Post listing cache lookups by result",
        &["result"]
    ).unwrap();
}
