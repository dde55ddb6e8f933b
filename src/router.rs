use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, warn};

use crate::containers::{Bills, Dashboard, NewBill};
use crate::storage::{self, LocalStorage, User, UserType};
use crate::store::BillsRepository;
use crate::views;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Bills,
    NewBill,
    Dashboard,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Login, Route::Bills, Route::NewBill, Route::Dashboard];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Bills => "/employee/bills",
            Route::NewBill => "/employee/bill/new",
            Route::Dashboard => "/admin/dashboard",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Bills => "Bills",
            Route::NewBill => "NewBill",
            Route::Dashboard => "Dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    /// The role a user needs to see this route.
    fn role(&self) -> Option<UserType> {
        match self {
            Route::Login => None,
            Route::Bills | Route::NewBill => Some(UserType::Employee),
            Route::Dashboard => Some(UserType::Admin),
        }
    }
}

/// Handle given to controllers to request a route change. Requests are
/// applied by the [`Router`] that created it on its next [`Router::settle`].
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: Sender<Route>,
}

impl Navigator {
    pub fn channel() -> (Navigator, Receiver<Route>) {
        let (tx, rx) = unbounded();
        (Navigator { tx }, rx)
    }

    pub fn navigate(&self, route: Route) {
        debug!(route = route.name(), "navigation requested");
        if self.tx.send(route).is_err() {
            warn!(route = route.name(), "navigation requested after router shut down");
        }
    }
}

/// Renders routes into the root container and binds their controllers.
pub struct Router {
    store: Arc<dyn BillsRepository>,
    storage: Arc<dyn LocalStorage>,
    navigator: Navigator,
    requests: Receiver<Route>,
    current: Route,
    root: String,
    bills: Option<Bills>,
    new_bill: Option<NewBill>,
}

impl Router {
    pub fn new(store: Arc<dyn BillsRepository>, storage: Arc<dyn LocalStorage>) -> Self {
        let (navigator, requests) = Navigator::channel();

        Self {
            store,
            storage,
            navigator,
            requests,
            current: Route::Login,
            root: views::login_ui(),
            bills: None,
            new_bill: None,
        }
    }

    pub fn navigator(&self) -> Navigator {
        self.navigator.clone()
    }

    pub fn storage(&self) -> &dyn LocalStorage {
        &*self.storage
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Markup of the root container.
    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn bills(&self) -> Option<&Bills> {
        self.bills.as_ref()
    }

    pub fn new_bill(&mut self) -> Option<&mut NewBill> {
        self.new_bill.as_mut()
    }

    fn user(&self) -> Option<User> {
        match storage::current_user(&*self.storage) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "ignoring unreadable session user");
                None
            }
        }
    }

    /// Navigates to the landing route of the stored session user.
    pub async fn start(&mut self) -> Route {
        let route = match self.user().map(|u| u.ty) {
            Some(UserType::Employee) => Route::Bills,
            Some(UserType::Admin) => Route::Dashboard,
            None => Route::Login,
        };

        self.on_navigate(route).await;
        self.current
    }

    pub async fn on_navigate(&mut self, route: Route) {
        let route = match route.role() {
            Some(role) if self.user().map(|u| u.ty) != Some(role) => {
                info!(route = route.name(), "session user may not access route");
                Route::Login
            }
            _ => route,
        };

        self.bills = None;
        self.new_bill = None;

        self.root = match route {
            Route::Login => views::login_ui(),
            Route::Bills => {
                let bills = Bills::new(self.store.clone(), self.navigator());
                let root = match bills.get_bills().await {
                    Ok(list) => views::bills_ui(&list),
                    Err(err) => views::error_page(Route::Bills, &err.to_string()),
                };
                self.bills = Some(bills);
                root
            }
            Route::NewBill => {
                self.new_bill = Some(NewBill::new(
                    self.store.clone(),
                    self.storage.clone(),
                    self.navigator(),
                ));
                views::new_bill_ui()
            }
            Route::Dashboard => match Dashboard::new(self.store.clone()).get_bills().await {
                Ok(list) => views::dashboard_ui(&list),
                Err(err) => views::error_page(Route::Dashboard, &err.to_string()),
            },
        };

        debug!(route = route.name(), "rendered route");
        self.current = route;
    }

    /// Applies the navigation requested by controllers since the last call.
    /// Returns the route shown afterwards when anything was applied.
    pub async fn settle(&mut self) -> Option<Route> {
        let mut applied = None;
        while let Ok(route) = self.requests.try_recv() {
            self.on_navigate(route).await;
            applied = Some(self.current);
        }
        applied
    }
}
