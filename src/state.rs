use std::sync::Arc;
use std::time::Duration;
use crate::catalog::Catalog;
use crate::config::Args;
use crate::rate_limit::{RateLimiter, SweepHandle};

pub const BUSINESS_CREATION: &str = "business_creation";
pub const API: &str = "api";
pub const MESSAGES: &str = "messages";

// The independently configured limiters, one map each
pub struct Limiters {
    pub business_creation: RateLimiter,
    pub api: RateLimiter,
    pub messages: RateLimiter,
}

impl Limiters {
    pub fn from_args(args: &Args) -> Self {
        Self {
            business_creation: RateLimiter::new(
                BUSINESS_CREATION,
                args.business_rate_limit,
                Duration::from_secs(args.business_rate_window),
            ),
            api: RateLimiter::new(
                API,
                args.api_rate_limit,
                Duration::from_secs(args.api_rate_window),
            ),
            messages: RateLimiter::new(
                MESSAGES,
                args.message_rate_limit,
                Duration::from_secs(args.message_rate_window),
            ),
        }
    }

    pub fn by_name(&self, name: &str) -> Option<&RateLimiter> {
        match name {
            BUSINESS_CREATION => Some(&self.business_creation),
            API => Some(&self.api),
            MESSAGES => Some(&self.messages),
            _ => None,
        }
    }

    pub fn all(&self) -> [&RateLimiter; 3] {
        [&self.business_creation, &self.api, &self.messages]
    }

    // One sweeper per limiter; they stop when the handles are dropped
    pub fn spawn_sweepers(&self, every: Duration) -> Vec<SweepHandle> {
        self.all()
            .into_iter()
            .map(|limiter| limiter.spawn_sweeper(every))
            .collect()
    }
}

// app's shared state
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub limiters: Limiters,
}
