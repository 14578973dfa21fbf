pub mod catalog;
pub mod config;
pub mod contract;
pub mod controller;
pub mod core_service;
pub mod hotkey;
pub mod logging;
pub mod model;
pub mod overlay_state;
pub mod personalization;
pub mod runtime;
pub mod search;
pub mod similarity;
pub mod storage;
pub mod theme;
pub mod transport;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
