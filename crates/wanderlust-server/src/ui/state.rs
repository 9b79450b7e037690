use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Itinerary, LogisticsEstimate};
use crate::services::budget::{ActivityKey, BudgetSummary, BudgetTracker};
use crate::services::map::MapView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Splash,
    Login,
    Home,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Flash {
    Info(String),
    Error(String),
}

/// The itinerary currently on screen.
#[derive(Debug, Clone)]
pub struct TripView {
    pub record_id: Option<i64>,
    pub destination: String,
    pub origin: Option<String>,
    pub itinerary: Itinerary,
    pub source: String,
    pub logistics: Option<LogisticsEstimate>,
    pub max_budget: Option<f64>,
    pub map: MapView,
}

/// Everything one browser sees. Transitions are plain assignments made by the
/// page handlers, followed by a full re-render.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub page: Page,
    pub active_user: Option<String>,
    pub trip: Option<TripView>,
    pub budget: BudgetTracker,
    /// Last travel bot exchange as (question, answer).
    pub answer: Option<(String, String)>,
    pub flash: Option<Flash>,
}

impl UiState {
    pub fn open_login(&mut self) {
        if self.page == Page::Splash {
            self.page = Page::Login;
        }
    }

    pub fn log_in(&mut self, username: &str) {
        self.page = Page::Home;
        self.active_user = Some(username.to_string());
        self.flash = Some(Flash::Info(format!("Welcome, {username}!")));
    }

    pub fn log_out(&mut self) {
        *self = UiState {
            page: Page::Login,
            ..Default::default()
        };
    }

    /// New trips start with every activity counted.
    pub fn show_trip(&mut self, view: TripView) {
        self.trip = Some(view);
        self.budget.reset();
        self.answer = None;
    }

    pub fn toggle_activity(&mut self, key: ActivityKey, included: bool) {
        self.budget.set_included(key, included);
    }

    pub fn budget_summary(&self) -> Option<BudgetSummary> {
        self.trip
            .as_ref()
            .map(|t| self.budget.summarize(&t.itinerary, t.max_budget))
    }

    pub fn take_flash(&mut self) -> Option<Flash> {
        self.flash.take()
    }
}

const IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);
const MAX_SESSIONS: usize = 10_000;

struct Slot {
    state: UiState,
    last_seen: Instant,
}

impl Slot {
    fn fresh() -> Self {
        Self {
            state: UiState::default(),
            last_seen: Instant::now(),
        }
    }
}

/// In-memory UI state keyed by the browser cookie. Lost on restart.
///
/// Ids are minted here; a browser idle for longer than the timeout starts over
/// on the splash page. At capacity the least recently seen browser is dropped.
#[derive(Clone)]
pub struct UiSessions {
    idle: Duration,
    capacity: usize,
    inner: Arc<RwLock<HashMap<String, Slot>>>,
}

impl Default for UiSessions {
    fn default() -> Self {
        Self::new(IDLE_TIMEOUT, MAX_SESSIONS)
    }
}

impl UiSessions {
    pub fn new(idle: Duration, capacity: usize) -> Self {
        Self {
            idle,
            capacity: capacity.max(1),
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a new browser and returns its id.
    pub async fn mint(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.inner.write().await;
        self.make_room(&mut sessions);
        sessions.insert(id.clone(), Slot::fresh());
        id
    }

    /// Whether `id` was minted here and has not gone idle.
    pub async fn contains(&self, id: &str) -> bool {
        self.inner
            .read()
            .await
            .get(id)
            .is_some_and(|slot| slot.last_seen.elapsed() < self.idle)
    }

    pub async fn load(&self, id: &str) -> UiState {
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(id) {
            Some(slot) if slot.last_seen.elapsed() < self.idle => {
                slot.last_seen = Instant::now();
                slot.state.clone()
            }
            _ => UiState::default(),
        }
    }

    /// Runs `f` on the state for `id`. An idle or evicted id restarts from the
    /// default state.
    pub async fn update<R>(&self, id: &str, f: impl FnOnce(&mut UiState) -> R) -> R {
        let mut sessions = self.inner.write().await;
        let live = sessions
            .get(id)
            .is_some_and(|slot| slot.last_seen.elapsed() < self.idle);
        if !live {
            sessions.remove(id);
            self.make_room(&mut sessions);
        }
        let slot = sessions.entry(id.to_string()).or_insert_with(Slot::fresh);
        slot.last_seen = Instant::now();
        f(&mut slot.state)
    }

    fn make_room(&self, sessions: &mut HashMap<String, Slot>) {
        let idle = self.idle;
        sessions.retain(|_, slot| slot.last_seen.elapsed() < idle);
        if sessions.len() < self.capacity {
            return;
        }
        let stalest = sessions
            .iter()
            .min_by_key(|(_, slot)| slot.last_seen)
            .map(|(id, _)| id.clone());
        if let Some(id) = stalest {
            tracing::debug!("UI session limit reached, dropping the least recent browser");
            sessions.remove(&id);
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TripType;
    use crate::services::map::build_map;
    use crate::services::planner::fallback::fallback_itinerary;

    fn view() -> TripView {
        let itinerary = fallback_itinerary("Goa", 3, TripType::Solo);
        TripView {
            record_id: Some(1),
            destination: "Goa".into(),
            origin: None,
            map: build_map(&itinerary, None),
            itinerary,
            source: "fallback".into(),
            logistics: None,
            max_budget: Some(8_000.0),
        }
    }

    #[test]
    fn page_flow() {
        let mut ui = UiState::default();
        assert_eq!(ui.page, Page::Splash);

        ui.open_login();
        assert_eq!(ui.page, Page::Login);

        ui.log_in("asha");
        assert_eq!(ui.page, Page::Home);
        assert_eq!(ui.active_user.as_deref(), Some("asha"));

        ui.show_trip(view());
        ui.log_out();
        assert_eq!(ui.page, Page::Login);
        assert!(ui.active_user.is_none());
        assert!(ui.trip.is_none());
    }

    #[test]
    fn open_login_does_not_leave_home() {
        let mut ui = UiState::default();
        ui.log_in("asha");
        ui.open_login();
        assert_eq!(ui.page, Page::Home);
    }

    #[test]
    fn new_trip_resets_toggles() {
        let mut ui = UiState::default();
        ui.show_trip(view());
        ui.toggle_activity(ActivityKey { day: 1, index: 0 }, false);

        let summary = ui.budget_summary().unwrap();
        assert_eq!(summary.total, 8_500.0);
        assert!(summary.over_budget);

        ui.show_trip(view());
        assert_eq!(ui.budget_summary().unwrap().total, 9_000.0);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let sessions = UiSessions::default();
        let a = sessions.mint().await;
        let b = sessions.mint().await;
        sessions.update(&a, |ui| ui.log_in("asha")).await;

        assert_eq!(sessions.load(&a).await.page, Page::Home);
        assert_eq!(sessions.load(&b).await.page, Page::Splash);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_registered() {
        let sessions = UiSessions::default();
        assert!(!sessions.contains("cookie-1").await);
        assert_eq!(sessions.load("cookie-1").await.page, Page::Splash);
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let sessions = UiSessions::new(Duration::ZERO, 10);
        let id = sessions.mint().await;
        sessions.update(&id, |ui| ui.log_in("asha")).await;

        assert!(!sessions.contains(&id).await);
        assert_eq!(sessions.load(&id).await.page, Page::Splash);
        assert!(sessions.load(&id).await.active_user.is_none());
    }

    #[tokio::test]
    async fn minting_is_bounded() {
        let sessions = UiSessions::new(Duration::from_secs(60), 3);
        for _ in 0..49 {
            sessions.mint().await;
        }
        let last = sessions.mint().await;

        assert_eq!(sessions.len().await, 3);
        assert!(sessions.contains(&last).await);
    }

    #[tokio::test]
    async fn expired_browsers_are_swept_when_minting() {
        let sessions = UiSessions::new(Duration::ZERO, 100);
        for _ in 0..20 {
            sessions.mint().await;
        }
        assert_eq!(sessions.len().await, 1);
    }
}
