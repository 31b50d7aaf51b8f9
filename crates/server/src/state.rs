use std::sync::Arc;

use crate::{
    auth::AuthService,
    config::ServerConfig,
    stats::{RankingBoard, StatsService},
};

#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
    auth: Arc<AuthService>,
    stats: StatsService,
    rankings: RankingBoard,
}

impl AppState {
    pub fn new(config: ServerConfig, auth: AuthService) -> Self {
        let stats = StatsService::new(config.strict_stats);
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
            stats,
            rankings: RankingBoard::default(),
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn stats(&self) -> &StatsService {
        &self.stats
    }

    pub fn rankings(&self) -> &RankingBoard {
        &self.rankings
    }
}
