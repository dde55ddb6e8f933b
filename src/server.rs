use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, ContentLengthLimit, Extension, Form, Multipart},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use thiserror::Error;
use tokio::signal;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::core::field;
use crate::dom::{FileInput, FormData, SelectedFile, SubmitEvent};
use crate::router::{Route, Router};
use crate::storage::{self, User, UserType, USER_KEY};

type Session = Arc<Mutex<Router>>;

/// Largest new bill form accepted, proof file included.
pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no page at {0}")]
    NotFound(String),
    #[error("malformed form upload")]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    Storage(#[from] storage::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, Html(self.to_string())),
            AppError::Multipart(_) => (StatusCode::BAD_REQUEST, Html(self.to_string())),
            AppError::Storage(err) => {
                error!(error = %err, "local storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html("something really bad happened".to_string()),
                )
            }
        }
        .into_response()
    }
}

pub fn app(router: Router) -> axum::Router {
    let session: Session = Arc::new(Mutex::new(router));

    axum::Router::new()
        .route("/", get(start))
        .route(Route::Bills.path(), get(show).post(click_new_bill))
        .route(Route::NewBill.path(), get(show).post(submit_new_bill))
        .route(Route::Dashboard.path(), get(show))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .layer(Extension(session))
}

/// Shows the root container when `requested` is what the router ended up
/// on, otherwise redirects to where it did.
fn render(router: &Router, requested: Route) -> Response {
    if router.current() == requested {
        Html(router.root().to_string()).into_response()
    } else {
        Redirect::to(router.current().path()).into_response()
    }
}

async fn start(Extension(session): Extension<Session>) -> Response {
    let mut router = session.lock().await;
    router.start().await;
    render(&router, Route::Login)
}

async fn show(uri: Uri, Extension(session): Extension<Session>) -> Result<Response, AppError> {
    let route =
        Route::from_path(uri.path()).ok_or_else(|| AppError::NotFound(uri.path().to_string()))?;

    let mut router = session.lock().await;
    router.on_navigate(route).await;
    Ok(render(&router, route))
}

async fn click_new_bill(Extension(session): Extension<Session>) -> Response {
    let mut router = session.lock().await;
    if router.current() != Route::Bills {
        router.on_navigate(Route::Bills).await;
    }

    if let Some(bills) = router.bills() {
        bills.handle_click_new_bill();
    }
    router.settle().await;

    Redirect::to(router.current().path()).into_response()
}

async fn read_new_bill(mut multipart: Multipart) -> Result<(FormData, FileInput), AppError> {
    let mut form = FormData::new();
    let mut input = FileInput::default();

    while let Some(part) = multipart.next_field().await? {
        let name = part.name().unwrap_or_default().to_string();
        if name == field::FILE {
            let file_name = part.file_name().unwrap_or_default().to_string();
            let mime_type = part
                .content_type()
                .map(|mime| mime.to_string())
                .unwrap_or_default();
            let content = part.bytes().await?;

            if !file_name.is_empty() {
                input = FileInput::select(SelectedFile::new(&file_name, &mime_type, &content));
            }
        } else {
            let value = part.text().await?;
            form.set(&name, &value);
        }
    }

    Ok((form, input))
}

async fn submit_new_bill(
    Extension(session): Extension<Session>,
    ContentLengthLimit(multipart): ContentLengthLimit<Multipart, { MAX_UPLOAD_BYTES }>,
) -> Result<Response, AppError> {
    let (form, mut input) = read_new_bill(multipart).await?;

    let mut router = session.lock().await;
    if router.current() != Route::NewBill {
        router.on_navigate(Route::NewBill).await;
    }

    let submitted = match router.new_bill() {
        Some(controller) => match controller.handle_change_file(&mut input) {
            Ok(accepted) => {
                debug!(file = %accepted.file_name, "submitting new bill");
                let mut event = SubmitEvent::new(form);
                // Detached: the outcome is logged by the task itself.
                drop(controller.handle_submit(&mut event));
                event.default_prevented()
            }
            Err(_) => false,
        },
        None => false,
    };

    if !submitted {
        warn!("new bill was not submitted");
        return Ok(render(&router, Route::NewBill));
    }

    router.settle().await;
    Ok(Redirect::to(router.current().path()).into_response())
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(rename = "type")]
    ty: UserType,
    email: String,
}

async fn login(
    Extension(session): Extension<Session>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let mut router = session.lock().await;
    storage::set_user(
        router.storage(),
        &User {
            ty: form.ty,
            email: Some(form.email),
        },
    )?;
    info!(user_type = ?form.ty, "session user stored");

    let route = router.start().await;
    Ok(Redirect::to(route.path()).into_response())
}

async fn logout(Extension(session): Extension<Session>) -> Result<Response, AppError> {
    let mut router = session.lock().await;
    router.storage().remove_item(USER_KEY)?;
    router.on_navigate(Route::Login).await;

    Ok(Redirect::to(Route::Login.path()).into_response())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("signal received, starting graceful shutdown");
}

pub async fn serve(addr: SocketAddr, router: Router) -> anyhow::Result<()> {
    let server = axum::Server::try_bind(&addr)?
        .serve(app(router).into_make_service())
        .with_graceful_shutdown(shutdown_signal());

    info!(%addr, "serving billed");
    println!("Visit http://{} to manage your bills.", addr);
    server.await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::extract::{FromRequest, RequestParts};
    use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION};
    use hyper::{Body, Client, Method, Request};
    use tokio::time::{sleep, timeout, Duration};

    use super::*;
    use crate::storage::{LocalStorage, MemoryStorage};
    use crate::store::{fixtures, BillsRepository, HttpStore, MemoryStore};
    use crate::views::{screen, ACTIVE_ICON};

    const BOUNDARY: &str = "billed-test-boundary";

    async fn spawn_app(user: Option<&str>) -> (SocketAddr, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::with_bills(fixtures()));
        (spawn_with(store.clone(), user), store)
    }

    fn spawn_with(store: Arc<dyn BillsRepository>, user: Option<&str>) -> SocketAddr {
        let storage = MemoryStorage::new();
        if let Some(user) = user {
            storage.set_item(USER_KEY, user).unwrap();
        }
        let router = Router::new(store, Arc::new(storage));

        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let server = axum::Server::bind(&addr).serve(app(router).into_make_service());
        let addr = server.local_addr();

        tokio::spawn(async move {
            server.await.unwrap();
        });

        addr
    }

    async fn get(addr: SocketAddr, path: &str) -> (StatusCode, Option<String>, String) {
        let res = Client::new()
            .get(format!("http://{}{}", addr, path).parse().unwrap())
            .await
            .unwrap();
        read(res).await
    }

    async fn read(res: hyper::Response<Body>) -> (StatusCode, Option<String>, String) {
        let status = res.status();
        let location = res
            .headers()
            .get(LOCATION)
            .map(|l| l.to_str().unwrap().to_string());
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();

        (status, location, String::from_utf8(body.to_vec()).unwrap())
    }

    fn multipart_body(fields: &[(&str, &str)], file: (&str, &str)) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            ));
        }
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\ntest\r\n--{}--\r\n",
            BOUNDARY, file.0, file.1, BOUNDARY
        ));
        body
    }

    async fn post_new_bill(
        addr: SocketAddr,
        file: (&str, &str),
    ) -> (StatusCode, Option<String>, String) {
        let body = multipart_body(
            &[
                ("expense-type", "Transports"),
                ("expense-name", "Vol Paris Londres"),
                ("datepicker", "2022-02-15"),
                ("amount", "348"),
                ("vat", "70"),
                ("pct", "20"),
                ("commentary", ""),
            ],
            file,
        );
        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("http://{}{}", addr, Route::NewBill.path()))
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();

        read(Client::new().request(req).await.unwrap()).await
    }

    #[tokio::test]
    async fn root_redirects_employee_to_bills() {
        let (addr, _) = spawn_app(Some(r#"{"type":"Employee"}"#)).await;

        let (status, location, _) = get(addr, "/").await;

        assert!(status.is_redirection());
        assert_eq!(location.as_deref(), Some(Route::Bills.path()));
    }

    #[tokio::test]
    async fn root_without_session_shows_login() {
        let (addr, _) = spawn_app(None).await;

        let (status, _, body) = get(addr, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(screen::get_by_test_id(&body, "form-employee").is_some());
    }

    #[tokio::test]
    async fn bills_page_highlights_window_icon() {
        let (addr, _) = spawn_app(Some(r#"{"type":"Employee"}"#)).await;

        let (status, _, body) = get(addr, Route::Bills.path()).await;

        assert_eq!(status, StatusCode::OK);
        let icon = screen::get_by_test_id(&body, "icon-window").unwrap();
        assert!(icon.has_class(ACTIVE_ICON));
    }

    #[tokio::test]
    async fn unknown_page_is_not_found() {
        let (addr, _) = spawn_app(None).await;

        let (status, _, _) = get(addr, "/employee/unknown").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn new_bill_with_image_is_stored_and_redirects() {
        let (addr, store) = spawn_app(Some(r#"{"type":"Employee","email":"a@a"}"#)).await;

        let (status, location, _) = post_new_bill(addr, ("test.jpg", "image/jpg")).await;

        assert!(status.is_redirection());
        assert_eq!(location.as_deref(), Some(Route::Bills.path()));

        for _ in 0..50 {
            if !store.updates().is_empty() {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(store.updates().len(), 1);
        assert_eq!(store.files()[0].file_name, "test.jpg");
    }

    #[tokio::test]
    async fn new_bill_with_pdf_is_not_sent() {
        let (addr, store) = spawn_app(Some(r#"{"type":"Employee"}"#)).await;

        let (status, _, body) = post_new_bill(addr, ("test.pdf", "application/pdf")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(screen::get_by_test_id(&body, "form-new-bill").is_some());
        assert!(store.updates().is_empty());
        assert!(store.files().is_empty());
    }

    #[tokio::test]
    async fn login_and_logout_update_session() {
        let (addr, _) = spawn_app(None).await;

        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("http://{}/login", addr))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("type=Admin&email=admin%40test.tld"))
            .unwrap();
        let (status, location, _) = read(Client::new().request(req).await.unwrap()).await;
        assert!(status.is_redirection());
        assert_eq!(location.as_deref(), Some(Route::Dashboard.path()));

        let (status, _, body) = get(addr, Route::Dashboard.path()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Validations"));

        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("http://{}/logout", addr))
            .body(Body::empty())
            .unwrap();
        let (status, location, _) = read(Client::new().request(req).await.unwrap()).await;
        assert!(status.is_redirection());
        assert_eq!(location.as_deref(), Some("/"));

        let (_, location, _) = get(addr, Route::Dashboard.path()).await;
        assert_eq!(location.as_deref(), Some("/"));
    }

    #[tokio::test]
    async fn stalled_backend_does_not_block_other_pages() {
        // Accepts connections in its backlog and never answers.
        let backend = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", backend.local_addr().unwrap());
        let store = Arc::new(HttpStore::new(&url, Duration::from_millis(200)).unwrap());
        let addr = spawn_with(store, Some(r#"{"type":"Employee"}"#));

        let bills = tokio::spawn(async move { get(addr, Route::Bills.path()).await });
        sleep(Duration::from_millis(20)).await;

        let (status, location, _) = timeout(Duration::from_secs(3), get(addr, "/"))
            .await
            .expect("root page waited on the stalled backend");
        assert!(status.is_redirection());
        assert_eq!(location.as_deref(), Some(Route::Bills.path()));

        let (status, _, body) = timeout(Duration::from_secs(3), bills)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status, StatusCode::OK);
        let message = screen::get_by_test_id(&body, "error-message");
        assert!(message.is_some());
        assert!(body.contains("backend did not answer within 200ms"));
    }

    #[tokio::test]
    async fn oversized_new_bill_is_refused() {
        let req = Request::builder()
            .method(Method::POST)
            .uri(Route::NewBill.path())
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(CONTENT_LENGTH, MAX_UPLOAD_BYTES + 1)
            .body(Body::empty())
            .unwrap();
        let mut parts = RequestParts::new(req);

        let extracted =
            ContentLengthLimit::<Multipart, { MAX_UPLOAD_BYTES }>::from_request(&mut parts).await;
        let rejection = match extracted {
            Ok(_) => panic!("oversized form was accepted"),
            Err(rejection) => rejection,
        };

        assert_eq!(rejection.into_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
