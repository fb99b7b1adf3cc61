//! Browser-backed storage and navigation

use gloo::storage::{SessionStorage, Storage};
use trabuddy_core::{CoreError, CoreResult, KeyValueStore, Navigator};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlDocument};

fn html_document() -> Option<HtmlDocument> {
    web_sys::window()?
        .document()?
        .dyn_into::<HtmlDocument>()
        .ok()
}

fn js_error(context: &str, error: JsValue) -> CoreError {
    CoreError::storage(format!("{context}: {error:?}"))
}

/// Token cookies visible to script
///
/// HttpOnly cookies set by the backend are invisible here; the browser still
/// attaches them to requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieStore;

impl CookieStore {
    fn write(&self, cookie: &str) -> CoreResult<()> {
        let document =
            html_document().ok_or_else(|| CoreError::storage("document is unavailable"))?;
        document
            .set_cookie(cookie)
            .map_err(|error| js_error("failed to write cookie", error))
    }
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> Option<String> {
        let cookies = html_document()?.cookie().ok()?;
        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_string())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.write(&format!("{key}={value}; path=/"))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.write(&format!("{key}=; path=/; max-age=0"))
    }
}

/// Tab-scoped `sessionStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore;

impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> Option<String> {
        SessionStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        SessionStorage::raw()
            .set_item(key, value)
            .map_err(|error| js_error("failed to write session storage", error))
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        SessionStorage::raw()
            .remove_item(key)
            .map_err(|error| js_error("failed to clear session storage", error))
    }
}

/// History API navigation
///
/// Pushes the new entry and dispatches `popstate` so the router re-renders.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn current_path(&self) -> String {
        let Some(location) = web_sys::window().map(|window| window.location()) else {
            return "/".to_string();
        };
        let path = location.pathname().unwrap_or_else(|_| "/".to_string());
        let search = location.search().unwrap_or_default();
        format!("{path}{search}")
    }

    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            tracing::warn!(path, "No window to navigate");
            return;
        };
        let pushed = window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(error) = pushed {
            tracing::warn!(path, ?error, "pushState failed; falling back to full load");
            let _ = window.location().set_href(path);
            return;
        }
        if let Ok(event) = Event::new("popstate") {
            let _ = window.dispatch_event(&event);
        }
    }
}
