use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::loader::DataLoader;
use crate::catalog::Catalog;
use crate::render::ViewMode;

/// Browse settings (admins can modify at runtime).
pub struct BrowseConfig {
    /// Items per reply page.
    pub page_size: usize,
    pub default_view: ViewMode,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            default_view: ViewMode::Grid,
        }
    }
}

impl BrowseConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(size) = dotenv::var("AGMP_PAGE_SIZE")
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
        {
            config.page_size = size;
        }
        config
    }
}

/// Comma-separated Discord user ids; entries that are not numbers are skipped.
pub fn parse_admin_ids(list: &str) -> HashSet<u64> {
    list.split(',')
        .filter_map(|s| s.trim().parse::<u64>().ok())
        .collect()
}

pub struct AppState {
    pub catalog: Arc<RwLock<Catalog>>,
    pub loader: Arc<DataLoader>,
    pub admin_ids: HashSet<u64>,
    pub browse_config: Arc<RwLock<BrowseConfig>>,
}

impl AppState {
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_ids.contains(&user_id)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;
