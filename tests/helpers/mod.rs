//! Shared fixtures: listing pages and a fake CAS + diploma portal.
#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use diplomski::portal::{Credentials, PortalConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

pub const USERNAME: &str = "student";
pub const PASSWORD: &str = "correct horse";
const EXECUTION: &str = "e1s1-0f9a";

/// One fixture panel: (title, [(label, value)], file href).
type Panel<'a> = (&'a str, &'a [(&'a str, &'a str)], Option<&'a str>);

fn render_panel((title, rows, file): &Panel<'_>) -> String {
    let mut body = String::new();
    for (label, value) in rows.iter() {
        body.push_str(&format!(
            "<tr><td><span class=\"text-muted\">{label}:</span></td><td><strong>{value}</strong></td></tr>\n"
        ));
    }
    if let Some(href) = file {
        body.push_str(&format!(
            "<tr><td>Датотека:</td><td><strong><a href=\"{href}\">Преземи</a></strong></td></tr>\n"
        ));
    }
    format!(
        r#"<div class="panel panel-primary">
    <div class="panel-heading"><h4 class="panel-title">{title}</h4></div>
    <div class="panel-body">
        <table class="table table-condensed"><tbody>
{body}        </tbody></table>
    </div>
</div>"#
    )
}

fn render_page(panels: &[Panel<'_>]) -> String {
    let panels: Vec<String> = panels.iter().map(render_panel).collect();
    format!(
        "<!DOCTYPE html><html><head><title>Дипломски</title></head><body><div class=\"container\">\n{}\n</div></body></html>",
        panels.join("\n")
    )
}

/// The logged-in listing: three diplomas, two mentors.
pub fn listing_html() -> String {
    render_page(&[
        (
            "Thesis A",
            &[
                ("Студент", "Ана Петровска"),
                ("Ментор", "Проф. Марковски"),
                ("Член 1", "Доц. Николова"),
                ("Датум на пријавување", "12.03.2025"),
                ("Статус", "Пријава"),
                ("Краток опис", "Анализа на мрежен сообраќај."),
            ],
            Some("javascript:void(0)"),
        ),
        (
            "Систем за препорака",
            &[
                ("Студент", "Марко Николов"),
                ("Ментор", "Проф. Марковски"),
                ("Член 1", "Доц. Николова"),
                ("Член 2", "Проф. Стојанова"),
                ("Датум на пријавување", "02.09.2024"),
                ("Статус", "Одбранета"),
                ("Краток опис", "Препораки со графови."),
            ],
            Some("/files/123.pdf"),
        ),
        (
            "Мрежи",
            &[
                ("Студент", "Дане Трајковски"),
                ("Ментор", "Проф. Стојанова"),
                ("Датум на пријавување", "15.01.2024"),
                ("Статус", "Архива"),
            ],
            None,
        ),
    ])
}

/// What the portal serves without a valid session.
pub fn public_listing_html() -> String {
    render_page(&[(
        "Јавна тема",
        &[
            ("Студент", "Ана Петровска"),
            ("Датум на одбрана", "01.07.2025"),
        ],
        None,
    )])
}

const LOGIN_PAGE: &str = r#"<html><body>
<form id="fm1" method="post">
    <input id="username" name="username" type="text" value="" />
    <input id="password" name="password" type="password" value="" />
    <input type="hidden" name="execution" value="e1s1-0f9a" />
    <input type="hidden" name="_eventId" value="submit" />
    <input type="submit" name="submit" value="LOGIN" />
</form>
</body></html>"#;

/// How the fake CAS answers a successful credentials POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectStyle {
    /// `Location: /relative/path`, which answers 200 and sets the portal session.
    Relative,
    /// `Location: {service}?ticket=ST-1`, which then redirects to `/DiplomaList`.
    ServiceTicket,
    /// `Location: /loop`, forever.
    Loop,
    /// The login page itself answers 503.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub cookie: Option<String>,
    pub form: Vec<(String, String)>,
}

struct FakeState {
    style: RedirectStyle,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeState {
    fn record(&self, method: &str, path: &str, headers: &HeaderMap, form: Vec<(String, String)>) {
        let cookie = headers
            .get(COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            cookie,
            form,
        });
    }
}

fn has_cookie(headers: &HeaderMap, pair: &str) -> bool {
    headers
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split("; ").any(|c| c == pair))
}

pub struct FakePortal {
    pub base: Url,
    state: Arc<FakeState>,
}

impl FakePortal {
    pub async fn spawn(style: RedirectStyle) -> Self {
        let state = Arc::new(FakeState {
            style,
            requests: Mutex::new(Vec::new()),
        });

        let router = Router::new()
            .route("/cas/login", get(cas_login_page).post(cas_login_submit))
            .route("/relative/path", get(relative_landing))
            .route("/Account/LoginCAS", get(service_ticket))
            .route("/loop", get(redirect_loop))
            .route("/DiplomaList", get(diploma_list))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base: Url::parse(&format!("http://{addr}/")).unwrap(),
            state,
        }
    }

    pub fn config(&self) -> PortalConfig {
        PortalConfig::new(
            self.base.join("/cas/login").unwrap(),
            self.base.join("/Account/LoginCAS").unwrap(),
            self.base.join("/DiplomaList").unwrap(),
        )
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

pub fn valid_credentials() -> Credentials {
    Credentials::new(USERNAME, PASSWORD)
}

async fn cas_login_page(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/cas/login", &headers, Vec::new());
    if state.style == RedirectStyle::Unavailable {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }
    (
        [(SET_COOKIE, "JSESSIONID=cas-1; Path=/cas; Secure; HttpOnly")],
        Html(LOGIN_PAGE),
    )
        .into_response()
}

async fn cas_login_submit(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<Vec<(String, String)>>,
) -> Response {
    state.record("POST", "/cas/login", &headers, form.clone());

    let field = |name: &str| {
        form.iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    };
    let accepted = has_cookie(&headers, "JSESSIONID=cas-1")
        && field("execution") == Some(EXECUTION)
        && field("username") == Some(USERNAME)
        && field("password") == Some(PASSWORD)
        && field("submit") == Some("LOGIN");

    if !accepted {
        return (StatusCode::UNAUTHORIZED, Html(LOGIN_PAGE)).into_response();
    }

    let location = match state.style {
        RedirectStyle::Relative => "/relative/path".to_string(),
        RedirectStyle::ServiceTicket => {
            let service = query.get("service").cloned().unwrap_or_default();
            format!("{service}?ticket=ST-1")
        }
        RedirectStyle::Loop => "/loop".to_string(),
        RedirectStyle::Unavailable => unreachable!(),
    };

    (
        StatusCode::FOUND,
        [
            (LOCATION, location),
            (SET_COOKIE, "TGC=tgt-1; Path=/cas; Secure".to_string()),
        ],
    )
        .into_response()
}

async fn relative_landing(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/relative/path", &headers, Vec::new());
    if !has_cookie(&headers, "TGC=tgt-1") {
        return StatusCode::FORBIDDEN.into_response();
    }
    ([(SET_COOKIE, "portal_session=abc; Path=/")], "welcome").into_response()
}

async fn service_ticket(
    State(state): State<Arc<FakeState>>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    state.record("GET", "/Account/LoginCAS", &headers, Vec::new());
    if query.get("ticket").map(String::as_str) != Some("ST-1") {
        return StatusCode::FORBIDDEN.into_response();
    }
    (
        StatusCode::FOUND,
        [
            (LOCATION, "/DiplomaList"),
            (SET_COOKIE, "portal_session=abc; Path=/; HttpOnly"),
        ],
    )
        .into_response()
}

async fn redirect_loop(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/loop", &headers, Vec::new());
    (StatusCode::FOUND, [(LOCATION, "/loop")]).into_response()
}

async fn diploma_list(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.record("GET", "/DiplomaList", &headers, Vec::new());
    if has_cookie(&headers, "portal_session=abc") {
        Html(listing_html()).into_response()
    } else {
        Html(public_listing_html()).into_response()
    }
}
