use crate::router::Route;

/// Class marking the sidebar icon of the current route.
pub const ACTIVE_ICON: &str = "active-icon";

const WINDOW_ICON: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24"><rect x="3" y="4" width="18" height="16" rx="2" fill="none" stroke="currentColor"/><line x1="3" y1="8" x2="21" y2="8" stroke="currentColor"/></svg>"#;
const MAIL_ICON: &str = r#"<svg width="24" height="24" viewBox="0 0 24 24"><rect x="3" y="5" width="18" height="14" rx="2" fill="none" stroke="currentColor"/><polyline points="3,5 12,13 21,5" fill="none" stroke="currentColor"/></svg>"#;

fn icon(id: &str, test_id: &str, href: &str, svg: &str, active: bool) -> String {
    let class = if active {
        format!(r#" class="{}""#, ACTIVE_ICON)
    } else {
        String::new()
    };

    format!(
        r#"<a id="{}" data-testid="{}"{} href="{}">{}</a>"#,
        id, test_id, class, href, svg
    )
}

fn vertical_layout(active: Route) -> String {
    format!(
        r#"<div class="vertical-navbar"><div class="layout-title">Billed</div>{}{}<form method="post" action="/logout"><button type="submit" id="layout-disconnect" data-testid="layout-disconnect">Se déconnecter</button></form></div>"#,
        icon(
            "layout-icon1",
            "icon-window",
            Route::Bills.path(),
            WINDOW_ICON,
            active == Route::Bills
        ),
        icon(
            "layout-icon2",
            "icon-mail",
            Route::NewBill.path(),
            MAIL_ICON,
            active == Route::NewBill
        ),
    )
}

/// Wraps a page body into the root container. Employee pages get the
/// vertical navigation bar.
pub fn document(route: Route, content: &str) -> String {
    let navbar = match route {
        Route::Bills | Route::NewBill => vertical_layout(route),
        Route::Login | Route::Dashboard => String::new(),
    };

    format!(
        r#"<!DOCTYPE html><html lang="fr"><head><meta charset="utf-8"/><title>Billed</title></head><body><div id="root" data-route="{}">{}<div class="content">{}</div></div></body></html>"#,
        route.name(),
        navbar,
        content
    )
}
