// src/state.rs

use axum::extract::FromRef;

use crate::{config::Config, config::PlanLimits, store::SharedStore};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub config: Config,
    pub limits: PlanLimits,
}

impl FromRef<AppState> for SharedStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for PlanLimits {
    fn from_ref(state: &AppState) -> Self {
        state.limits
    }
}
