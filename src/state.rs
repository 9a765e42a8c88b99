use std::sync::Arc;

use crate::config::Config;
use crate::domain::ports::ReservationRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub reservation_repo: Arc<dyn ReservationRepository>,
}
