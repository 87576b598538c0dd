//! # Store
//!
//! Owns the root state and the API gateway for one session. Built once at
//! startup and passed by reference (or `Arc`) to whoever needs it.
//!
//! State lives in a `tokio::sync::watch` channel: each `dispatch()` applies
//! one action under the channel lock, so transitions never interleave, and
//! every subscriber is woken afterwards.

use std::sync::Arc;

use log::debug;
use tokio::sync::watch;

use crate::api::{ApiClient, Offer, User};
use crate::core::action::{Action, Effect, update};
use crate::core::selectors::Selectors;
use crate::core::state::{AuthStatus, RootState};

/// Everything a view needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub selected_city: String,
    pub offers: Arc<Vec<Offer>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub auth_status: AuthStatus,
    pub user: Option<User>,
    pub filtered_offers: Arc<Vec<Offer>>,
    pub favorite_count: usize,
}

pub struct Store {
    state: Arc<watch::Sender<RootState>>,
    api: ApiClient,
    selectors: Selectors,
}

impl Store {
    /// Wraps `api` and wires its 401 hook to sign the session out.
    pub fn new(api: ApiClient) -> Self {
        Self::with_state(api, RootState::default())
    }

    pub fn with_state(mut api: ApiClient, initial: RootState) -> Self {
        let (sender, _) = watch::channel(initial);
        let state = Arc::new(sender);

        let deauth = Arc::clone(&state);
        api.set_unauthorized_handler(Arc::new(move || {
            deauth.send_modify(|s| {
                for action in [
                    Action::RequireAuthorization(AuthStatus::NotAuthenticated),
                    Action::SetUser(None),
                ] {
                    debug!("dispatch {} (401)", action.name());
                    update(s, action);
                }
            });
        }));

        Self {
            state,
            api,
            selectors: Selectors::new(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Applies one action and carries out the effect it asks for.
    pub fn dispatch(&self, action: Action) {
        debug!("dispatch {}", action.name());
        let mut effect = Effect::None;
        self.state.send_modify(|state| {
            effect = update(state, action);
        });
        match effect {
            Effect::None => {}
            Effect::ClearToken => self.api.tokens().clear(),
        }
    }

    /// Snapshot of the current state. Cheap: collections are shared.
    pub fn state(&self) -> RootState {
        self.state.borrow().clone()
    }

    /// Receiver that is marked changed after every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.state.borrow().user.auth_status
    }

    pub fn filtered_offers(&self) -> Arc<Vec<Offer>> {
        self.selectors.filtered_offers(&self.state.borrow())
    }

    pub fn favorite_count(&self) -> usize {
        self.selectors.favorite_count(&self.state.borrow())
    }

    pub fn view(&self) -> ViewState {
        let state = self.state();
        ViewState {
            filtered_offers: self.selectors.filtered_offers(&state),
            favorite_count: self.selectors.favorite_count(&state),
            selected_city: state.app.selected_city,
            offers: state.offers.offers,
            is_loading: state.offers.is_loading,
            error: state.offers.error,
            auth_status: state.user.auth_status,
            user: state.user.user,
        }
    }
}

/// Which loading flag a guard owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingFlag {
    Offers,
    Reviews,
}

impl LoadingFlag {
    fn action(self, is_loading: bool) -> Action {
        match self {
            LoadingFlag::Offers => Action::SetOffersLoading(is_loading),
            LoadingFlag::Reviews => Action::SetReviewsLoading(is_loading),
        }
    }
}

/// Sets a loading flag on creation and clears it when dropped, on every
/// exit path of the operation holding it.
pub struct LoadingGuard<'a> {
    store: &'a Store,
    flag: LoadingFlag,
}

impl<'a> LoadingGuard<'a> {
    pub fn acquire(store: &'a Store, flag: LoadingFlag) -> Self {
        store.dispatch(flag.action(true));
        Self { store, flag }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.dispatch(self.flag.action(false));
    }
}
