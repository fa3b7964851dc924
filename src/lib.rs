pub mod core {
    pub mod config;
    pub mod error;
    pub mod routes;
    pub mod startup;
    pub mod state;
    pub mod tracing_init;
}

pub mod models {
    pub mod api;
    pub mod history;
    pub mod user;
}

pub mod stores {
    pub mod history;
    pub mod presence;
    pub mod registry;
    pub mod roster;
}

pub mod draw {
    pub mod engine;
}

pub mod persistence {
    pub mod snapshot;
}

pub mod metrics {
    pub mod collector;
}

pub mod validation {
    pub mod params;
}

pub mod utils {
    pub mod time;
}

pub mod handlers {
    pub mod draw;
    pub mod fallback;
    pub mod health;
    pub mod history;
    pub mod presence;
    pub mod stats;
    pub mod users;

    #[cfg(test)]
    pub mod test_support;
}
