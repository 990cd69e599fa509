//! Server-rendered HTML pages

use std::fmt::Write;

use axum::http::StatusCode;
use axum::response::Html;
use chrono::{DateTime, Utc};
use common::pagination::Page;

use crate::flash::{Flash, FlashKind};
use crate::messages::Locale;
use crate::middleware::Principal;
use crate::models::{Bug, NewBug, NewUser, Priority, ProfileUpdate, SearchableBugField, Status, User};
use crate::validation::ValidationErrors;

/// What every page needs besides its own content
pub struct PageContext<'a> {
    pub locale: Locale,
    pub principal: Option<&'a Principal>,
    pub flash: Option<Flash>,
}

impl PageContext<'_> {
    fn t<'k>(&self, key: &'k str) -> &'k str {
        self.locale.text(key)
    }
}

/// Whether a form creates a record or edits the one with this id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Escape text for HTML element content and quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

fn layout(ctx: &PageContext<'_>, title: &str, body: &str) -> Html<String> {
    let mut nav = String::new();
    let _ = write!(
        nav,
        r#"<a href="/">{}</a> <a href="/about">{}</a>"#,
        ctx.t("nav.home"),
        ctx.t("nav.about")
    );
    match ctx.principal {
        Some(principal) => {
            let _ = write!(
                nav,
                r#" <a href="/bugs">{}</a> <a href="/bugs/search">{}</a> <a href="/profile">{}</a>"#,
                ctx.t("nav.bugs"),
                ctx.t("nav.search"),
                ctx.t("nav.profile")
            );
            if principal.is_admin() {
                let _ = write!(nav, r#" <a href="/users">{}</a>"#, ctx.t("nav.users"));
            }
            let _ = write!(
                nav,
                r#" <form method="post" action="/logout" class="inline"><button type="submit">{} ({})</button></form>"#,
                ctx.t("nav.logout"),
                escape(&principal.username)
            );
        }
        None => {
            let _ = write!(
                nav,
                r#" <a href="/auth">{}</a> <a href="/register">{}</a>"#,
                ctx.t("nav.login"),
                ctx.t("nav.register")
            );
        }
    }

    let flash = match &ctx.flash {
        Some(flash) => {
            let class = match flash.kind {
                FlashKind::Success => "flash success",
                FlashKind::Error => "flash error",
            };
            let text = match &flash.arg {
                Some(arg) => ctx.locale.format(&flash.key, arg),
                None => ctx.t(&flash.key).to_string(),
            };
            format!(r#"<div class="{class}">{}</div>"#, escape(&text))
        }
        None => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} - {app}</title>
<style>{STYLE}</style>
</head>
<body>
<header><strong>{app}</strong> <nav>{nav}</nav> <span class="lang"><a href="?lang=en">EN</a> | <a href="?lang=fr">FR</a></span></header>
<main>
{flash}
<h1>{title}</h1>
{body}
</main>
</body>
</html>"#,
        lang = ctx.locale.tag(),
        app = ctx.t("app.title"),
        title = escape(title),
    ))
}

const STYLE: &str = "body{font-family:sans-serif;margin:0}header{background:#234;color:#fff;padding:.6em 1em}\
header a,header button{color:#fff;margin-right:.6em}main{padding:1em 2em}table{border-collapse:collapse}\
td,th{border:1px solid #ccc;padding:.3em .6em}.error{color:#b00}.flash{padding:.6em;margin-bottom:1em}\
.flash.success{background:#dfd}.flash.error{background:#fdd}form.inline{display:inline}\
label{display:block;margin-top:.6em}button.link{background:none;border:none;cursor:pointer}";

/// Fallback page for failures outside the normal form flow
pub fn error_page(status: StatusCode, detail: &str) -> Html<String> {
    let reason = status.canonical_reason().unwrap_or("Error");
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{code} {reason}</title></head>
<body>
<h1>{code} {reason}</h1>
<p>{detail}</p>
<p><a href="/">Home</a></p>
</body>
</html>"#,
        code = status.as_u16(),
        detail = escape(detail),
    ))
}

fn field_error(ctx: &PageContext<'_>, errors: &ValidationErrors, field: &str) -> String {
    match errors.for_field(field) {
        Some(key) => format!(r#"<span class="error">{}</span>"#, escape(ctx.t(key))),
        None => String::new(),
    }
}

fn text_input(
    ctx: &PageContext<'_>,
    errors: &ValidationErrors,
    field: &str,
    kind: &str,
    value: &str,
) -> String {
    format!(
        r#"<label>{label} <input type="{kind}" name="{field}" value="{value}"> {error}</label>"#,
        label = ctx.t(&format!("field.{field}")),
        value = escape(value),
        error = field_error(ctx, errors, field),
    )
}

fn password_input(ctx: &PageContext<'_>, errors: &ValidationErrors, hint: Option<&str>) -> String {
    let hint = hint
        .map(|key| format!(r#" <small>{}</small>"#, ctx.t(key)))
        .unwrap_or_default();
    format!(
        r#"<label>{label} <input type="password" name="password" autocomplete="new-password">{hint} {error}</label>"#,
        label = ctx.t("field.password"),
        error = field_error(ctx, errors, "password"),
    )
}

fn priority_options(ctx: &PageContext<'_>, selected: Priority) -> String {
    Priority::ALL
        .iter()
        .map(|p| {
            let sel = if *p == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{sel}>{}</option>"#, p.as_str(), ctx.locale.priority(*p))
        })
        .collect()
}

fn status_options(ctx: &PageContext<'_>, selected: Status) -> String {
    Status::ALL
        .iter()
        .map(|s| {
            let sel = if *s == selected { " selected" } else { "" };
            format!(r#"<option value="{}"{sel}>{}</option>"#, s.as_str(), ctx.locale.status(*s))
        })
        .collect()
}

/// Previous/next links; `base` is a path with any fixed query parameters
fn pager<T>(ctx: &PageContext<'_>, page: &Page<T>, base: &str) -> String {
    if page.total_pages() <= 1 {
        return String::new();
    }
    let sep = if base.contains('?') { '&' } else { '?' };
    let mut out = String::from(r#"<p class="pager">"#);
    if page.has_previous() {
        let _ = write!(
            out,
            r#"<a href="{base}{sep}page={}&size={}">{}</a> "#,
            page.page - 1,
            page.size,
            ctx.t("page.previous")
        );
    }
    let _ = write!(
        out,
        "{} / {}",
        ctx.locale.format("page.info", &(page.page + 1).to_string()),
        page.total_pages()
    );
    if page.has_next() {
        let _ = write!(
            out,
            r#" <a href="{base}{sep}page={}&size={}">{}</a>"#,
            page.page + 1,
            page.size,
            ctx.t("page.next")
        );
    }
    out.push_str("</p>");
    out
}

fn bug_table(ctx: &PageContext<'_>, bugs: &[Bug]) -> String {
    if bugs.is_empty() {
        return format!("<p>{}</p>", ctx.t("bugs.empty"));
    }
    let mut out = format!(
        "<table><tr><th>{}</th><th>{}</th><th>{}</th><th>{}</th><th>{}</th></tr>",
        ctx.t("field.id"),
        ctx.t("field.title"),
        ctx.t("field.priority"),
        ctx.t("field.status"),
        ctx.t("field.updated_at"),
    );
    for bug in bugs {
        let _ = write!(
            out,
            r#"<tr><td>{id}</td><td><a href="/bugs/{id}">{title}</a></td><td>{priority}</td><td>{status}</td><td>{updated}</td></tr>"#,
            id = bug.id,
            title = escape(&bug.title),
            priority = ctx.locale.priority(bug.priority),
            status = ctx.locale.status(bug.status),
            updated = timestamp(&bug.updated_at),
        );
    }
    out.push_str("</table>");
    out
}

pub fn home(ctx: &PageContext<'_>, bug_count: Option<i64>) -> Html<String> {
    let mut body = format!("<p>{}</p>", ctx.t("home.intro"));
    if let Some(principal) = ctx.principal {
        let _ = write!(
            body,
            "<p>{}</p>",
            escape(&ctx.locale.format("home.greeting", &principal.username))
        );
    }
    if let Some(count) = bug_count {
        let _ = write!(body, "<p>{}</p>", ctx.locale.format("home.stats", &count.to_string()));
    }
    layout(ctx, ctx.t("home.welcome"), &body)
}

pub fn about(ctx: &PageContext<'_>) -> Html<String> {
    layout(ctx, ctx.t("about.title"), &format!("<p>{}</p>", ctx.t("about.body")))
}

pub fn login(ctx: &PageContext<'_>, failed: bool, logged_out: bool) -> Html<String> {
    let mut body = String::new();
    if failed {
        let _ = write!(body, r#"<p class="error">{}</p>"#, ctx.t("login.error"));
    }
    if logged_out {
        let _ = write!(body, "<p>{}</p>", ctx.t("login.logout"));
    }
    let _ = write!(
        body,
        r#"<form method="post" action="/login">
<label>{} <input type="text" name="username" autofocus></label>
<label>{} <input type="password" name="password"></label>
<button type="submit">{}</button>
</form>
<p><a href="/register">{}</a></p>"#,
        ctx.t("field.username"),
        ctx.t("field.password"),
        ctx.t("login.submit"),
        ctx.t("nav.register"),
    );
    layout(ctx, ctx.t("login.title"), &body)
}

pub fn register(ctx: &PageContext<'_>, values: &NewUser, errors: &ValidationErrors) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/register">
{}
{}
{}
{}
{}
<button type="submit">{}</button>
</form>"#,
        text_input(ctx, errors, "username", "text", &values.username),
        password_input(ctx, errors, None),
        text_input(ctx, errors, "first_name", "text", &values.first_name),
        text_input(ctx, errors, "last_name", "text", &values.last_name),
        text_input(ctx, errors, "email", "email", &values.email),
        ctx.t("register.submit"),
    );
    layout(ctx, ctx.t("register.title"), &body)
}

pub fn bug_list(ctx: &PageContext<'_>, page: &Page<Bug>) -> Html<String> {
    let body = format!(
        r#"<p><a href="/bugs/new">{}</a></p>{}{}"#,
        ctx.t("bugs.new"),
        bug_table(ctx, &page.content),
        pager(ctx, page, "/bugs"),
    );
    layout(ctx, ctx.t("bugs.title"), &body)
}

pub fn bug_form(
    ctx: &PageContext<'_>,
    mode: FormMode,
    values: &NewBug,
    users: &[User],
    errors: &ValidationErrors,
) -> Html<String> {
    let (title, action) = match mode {
        FormMode::Create => (ctx.t("bugs.new"), "/bugs".to_string()),
        FormMode::Edit(id) => (ctx.t("bugs.edit"), format!("/bugs/{id}/edit")),
    };

    let mut body = format!(
        r#"<form method="post" action="{action}">
{title_input}
<label>{description_label} <textarea name="description" rows="6" cols="60">{description}</textarea> {description_error}</label>
<label>{priority_label} <select name="priority">{priorities}</select></label>
<label>{status_label} <select name="status">{statuses}</select></label>
"#,
        title_input = text_input(ctx, errors, "title", "text", &values.title),
        description_label = ctx.t("field.description"),
        description = escape(&values.description),
        description_error = field_error(ctx, errors, "description"),
        priority_label = ctx.t("field.priority"),
        priorities = priority_options(ctx, values.priority),
        status_label = ctx.t("field.status"),
        statuses = status_options(ctx, values.status),
    );

    // Assignment of an existing bug changes through its own actions.
    if mode == FormMode::Create && !users.is_empty() {
        let _ = write!(body, "<fieldset><legend>{}</legend>", ctx.t("field.assignees"));
        for user in users {
            let checked = if values.assignee_ids.contains(&user.id) { " checked" } else { "" };
            let _ = write!(
                body,
                r#"<label><input type="checkbox" name="assignee_ids" value="{}"{checked}> {}</label>"#,
                user.id,
                escape(&user.username)
            );
        }
        body.push_str("</fieldset>");
    }

    let cancel = match mode {
        FormMode::Create => "/bugs".to_string(),
        FormMode::Edit(id) => format!("/bugs/{id}"),
    };
    let _ = write!(
        body,
        r#"<button type="submit">{}</button> <a href="{cancel}">{}</a></form>"#,
        ctx.t("action.save"),
        ctx.t("action.cancel")
    );
    layout(ctx, title, &body)
}

pub fn bug_detail(
    ctx: &PageContext<'_>,
    bug: &Bug,
    assigned: &[User],
    all_users: &[User],
) -> Html<String> {
    let mut body = format!(
        r#"<table>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
</table>
<p class="description">{}</p>
<p><a href="/bugs/{}/edit">{}</a></p>
<h2>{}</h2>"#,
        ctx.t("field.id"),
        bug.id,
        ctx.t("field.priority"),
        ctx.locale.priority(bug.priority),
        ctx.t("field.status"),
        ctx.locale.status(bug.status),
        ctx.t("field.created_at"),
        timestamp(&bug.created_at),
        ctx.t("field.updated_at"),
        timestamp(&bug.updated_at),
        escape(&bug.description),
        bug.id,
        ctx.t("action.edit"),
        ctx.t("field.assignees"),
    );

    if assigned.is_empty() {
        let _ = write!(body, "<p>{}</p>", ctx.t("bugs.unassigned"));
    } else {
        body.push_str("<ul>");
        for user in assigned {
            let _ = write!(
                body,
                r#"<li>{} ({}) <form method="post" action="/bugs/{}/unassign" class="inline"><input type="hidden" name="user_id" value="{}"><button type="submit" class="link">{}</button></form></li>"#,
                escape(&user.full_name()),
                escape(&user.username),
                bug.id,
                user.id,
                ctx.t("bugs.unassign"),
            );
        }
        body.push_str("</ul>");
    }

    let candidates: Vec<&User> = all_users
        .iter()
        .filter(|u| !assigned.iter().any(|a| a.id == u.id))
        .collect();
    if !candidates.is_empty() {
        let _ = write!(
            body,
            r#"<form method="post" action="/bugs/{}/assign"><select name="user_id">"#,
            bug.id
        );
        for user in candidates {
            let _ = write!(
                body,
                r#"<option value="{}">{}</option>"#,
                user.id,
                escape(&user.username)
            );
        }
        let _ = write!(
            body,
            r#"</select> <button type="submit">{}</button></form>"#,
            ctx.t("bugs.assign")
        );
    }

    if ctx.principal.is_some_and(Principal::is_admin) {
        let _ = write!(
            body,
            r#"<form method="post" action="/bugs/{}/delete"><button type="submit">{}</button></form>"#,
            bug.id,
            ctx.t("bugs.delete")
        );
    }

    layout(ctx, &bug.title, &body)
}

/// Submitted search parameters, echoed back into the form
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub field: Option<SearchableBugField>,
    pub value: String,
    pub exact: bool,
}

pub fn search(
    ctx: &PageContext<'_>,
    form: &SearchForm,
    results: Option<&Page<Bug>>,
    message_key: Option<&str>,
) -> Html<String> {
    let options: String = SearchableBugField::ALL
        .iter()
        .map(|f| {
            let sel = if form.field == Some(*f) { " selected" } else { "" };
            let name = f.field_name();
            format!(r#"<option value="{name}"{sel}>{}</option>"#, ctx.t(&format!("field.{name}")))
        })
        .collect();

    let mut body = format!(
        r#"<form method="get" action="/bugs/search">
<label>{} <select name="field">{options}</select></label>
<label>{} <input type="text" name="value" value="{}"></label>
<label><input type="checkbox" name="exact" value="true"{}> {}</label>
<button type="submit">{}</button>
</form>"#,
        ctx.t("search.field"),
        ctx.t("search.value"),
        escape(&form.value),
        if form.exact { " checked" } else { "" },
        ctx.t("search.exact"),
        ctx.t("search.submit"),
    );

    if let Some(key) = message_key {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape(ctx.t(key)));
    }

    if let Some(page) = results {
        let base = format!(
            "/bugs/search?field={}&value={}&exact={}",
            form.field.map(|f| f.field_name()).unwrap_or_default(),
            url_encode(&form.value),
            form.exact
        );
        let _ = write!(
            body,
            "<p>{}</p>{}{}",
            ctx.locale.format("search.results", &page.total_elements.to_string()),
            bug_table(ctx, &page.content),
            pager(ctx, page, &escape(&base)),
        );
    }

    layout(ctx, ctx.t("search.title"), &body)
}

/// Percent-encode a query parameter value
fn url_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

pub fn profile(ctx: &PageContext<'_>, user: &User, bugs: &[Bug]) -> Html<String> {
    let body = format!(
        r#"<table>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
<tr><th>{}</th><td>{}</td></tr>
</table>
<p><a href="/profile/edit">{}</a></p>
<h2>{}</h2>
{}"#,
        ctx.t("field.username"),
        escape(&user.username),
        ctx.t("field.first_name"),
        escape(&user.first_name),
        ctx.t("field.last_name"),
        escape(&user.last_name),
        ctx.t("field.email"),
        escape(&user.email),
        ctx.t("field.role"),
        user.role(),
        ctx.t("profile.edit"),
        ctx.t("profile.assigned"),
        bug_table(ctx, bugs),
    );
    layout(ctx, ctx.t("profile.title"), &body)
}

pub fn profile_form(
    ctx: &PageContext<'_>,
    values: &ProfileUpdate,
    errors: &ValidationErrors,
) -> Html<String> {
    let body = format!(
        r#"<form method="post" action="/profile/edit">
{}
{}
{}
{}
<button type="submit">{}</button> <a href="/profile">{}</a>
</form>"#,
        text_input(ctx, errors, "first_name", "text", &values.first_name),
        text_input(ctx, errors, "last_name", "text", &values.last_name),
        text_input(ctx, errors, "email", "email", &values.email),
        password_input(ctx, errors, Some("profile.password.hint")),
        ctx.t("action.save"),
        ctx.t("action.cancel"),
    );
    layout(ctx, ctx.t("profile.edit"), &body)
}

pub fn user_list(
    ctx: &PageContext<'_>,
    page: &Page<User>,
    sort: &str,
    message_key: Option<&str>,
) -> Html<String> {
    let mut body = format!(r#"<p><a href="/users/new">{}</a></p>"#, ctx.t("users.new"));
    if let Some(key) = message_key {
        let _ = write!(body, r#"<p class="error">{}</p>"#, escape(ctx.t(key)));
    }

    if page.is_empty() {
        let _ = write!(body, "<p>{}</p>", ctx.t("users.empty"));
    } else {
        let header = |key: &str, property: &str| {
            format!(r#"<th><a href="/users?sort={property}">{}</a></th>"#, ctx.t(key))
        };
        let _ = write!(
            body,
            "<table><tr>{}{}{}{}{}<th>{}</th><th></th></tr>",
            header("field.id", "id"),
            header("field.username", "username"),
            header("field.first_name", "firstName"),
            header("field.last_name", "lastName"),
            header("field.email", "email"),
            ctx.t("field.role"),
        );
        for user in &page.content {
            let _ = write!(
                body,
                r#"<tr><td>{id}</td><td>{username}</td><td>{first}</td><td>{last}</td><td>{email}</td><td>{role}</td><td><a href="/users/{id}/edit">{edit}</a> <form method="post" action="/users/{id}/delete" class="inline"><button type="submit" class="link">{delete}</button></form></td></tr>"#,
                id = user.id,
                username = escape(&user.username),
                first = escape(&user.first_name),
                last = escape(&user.last_name),
                email = escape(&user.email),
                role = user.role(),
                edit = ctx.t("action.edit"),
                delete = ctx.t("users.delete"),
            );
        }
        body.push_str("</table>");
    }

    let base = if sort.is_empty() {
        "/users".to_string()
    } else {
        escape(&format!("/users?sort={}", url_encode(sort)))
    };
    body.push_str(&pager(ctx, page, &base));
    layout(ctx, ctx.t("users.title"), &body)
}

pub fn user_form(
    ctx: &PageContext<'_>,
    mode: FormMode,
    values: &NewUser,
    errors: &ValidationErrors,
) -> Html<String> {
    let (title, action, hint) = match mode {
        FormMode::Create => (ctx.t("users.new"), "/users".to_string(), None),
        FormMode::Edit(id) => (
            ctx.t("users.edit"),
            format!("/users/{id}/edit"),
            Some("profile.password.hint"),
        ),
    };

    let body = format!(
        r#"<form method="post" action="{action}">
{}
{}
{}
{}
{}
<label><input type="checkbox" name="admin" value="true"{}> {}</label>
<button type="submit">{}</button> <a href="/users">{}</a>
</form>"#,
        text_input(ctx, errors, "username", "text", &values.username),
        password_input(ctx, errors, hint),
        text_input(ctx, errors, "first_name", "text", &values.first_name),
        text_input(ctx, errors, "last_name", "text", &values.last_name),
        text_input(ctx, errors, "email", "email", &values.email),
        if values.admin { " checked" } else { "" },
        ctx.t("field.admin"),
        ctx.t("action.save"),
        ctx.t("action.cancel"),
    );
    layout(ctx, title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#39;y&#39;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("login page"), "login%20page");
        assert_eq!(url_encode("a&b=é"), "a%26b%3D%C3%A9");
    }

    #[test]
    fn test_layout_shows_admin_links_only_to_admins() {
        let admin = Principal {
            username: "jdoe".to_string(),
            role: crate::models::Role::Admin,
        };
        let ctx = PageContext {
            locale: Locale::En,
            principal: Some(&admin),
            flash: None,
        };
        assert!(about(&ctx).0.contains(r#"href="/users""#));

        let user = Principal {
            username: "asmith".to_string(),
            role: crate::models::Role::User,
        };
        let ctx = PageContext {
            locale: Locale::En,
            principal: Some(&user),
            flash: None,
        };
        let html = about(&ctx).0;
        assert!(!html.contains(r#"href="/users""#));
        assert!(html.contains("asmith"));
    }

    #[test]
    fn test_flash_rendered_in_locale() {
        let ctx = PageContext {
            locale: Locale::Fr,
            principal: None,
            flash: Some(Flash::success("flash.bug.created")),
        };
        assert!(home(&ctx, None).0.contains("Bogue créé avec succès."));
    }

    #[test]
    fn test_user_content_is_escaped() {
        let ctx = PageContext {
            locale: Locale::En,
            principal: None,
            flash: None,
        };
        let values = NewUser {
            username: "<b>x</b>".to_string(),
            ..NewUser::default()
        };
        let html = register(&ctx, &values, &ValidationErrors::new()).0;
        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        assert!(!html.contains("<b>x</b>"));
    }
}
