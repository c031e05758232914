//! Server-rendered admin dashboard behind HTTP Basic auth.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    middleware::admin::AdminAuth,
    models::{post::Post, user::User},
    response::{parse_id, ApiError},
    services::{posts::PostService, users::UserService},
    AppState,
};

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn layout(title: &str, current: &str, body: &str) -> Html<String> {
    let nav: String = [("/admin/", "Overview"), ("/admin/users", "Users"), ("/admin/posts", "Posts")]
        .iter()
        .map(|(href, label)| {
            let class = if *href == current { " class=\"active\"" } else { "" };
            format!("<a href=\"{href}\"{class}>{label}</a>")
        })
        .collect::<Vec<_>>()
        .join(" | ");

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title} · Admin</title>
<style>
body {{ font-family: sans-serif; margin: 2rem; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: 0.3rem 0.6rem; text-align: left; }}
a.active {{ font-weight: bold; }}
</style>
<script>
async function remove(path) {{
  if (!confirm('Delete ' + path + '?')) return;
  const res = await fetch(path, {{ method: 'DELETE' }});
  if (res.ok) location.reload(); else alert('Delete failed: ' + res.status);
}}
</script>
</head>
<body>
<nav>{nav}</nav>
<h1>{title}</h1>
{body}
</body>
</html>"#
    ))
}

fn users_table(users: &[User]) -> String {
    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                "<tr><td>{id}</td><td>{email}</td><td>{role}</td><td>{created}</td>\
                 <td><button onclick=\"remove('/admin/users/{id}')\">Delete</button></td></tr>",
                id = u.id,
                email = escape(&u.email),
                role = escape(&u.role),
                created = u.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();
    format!("<table><tr><th>ID</th><th>Email</th><th>Role</th><th>Created</th><th></th></tr>{rows}</table>")
}

fn posts_table(posts: &[Post]) -> String {
    let rows: String = posts
        .iter()
        .map(|p| {
            format!(
                "<tr><td>{id}</td><td>{title}</td><td>{author}</td><td>{created}</td>\
                 <td><button onclick=\"remove('/admin/posts/{id}')\">Delete</button></td></tr>",
                id = p.id,
                title = escape(&p.title),
                author = escape(&p.author_email),
                created = p.created_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();
    format!("<table><tr><th>ID</th><th>Title</th><th>Author</th><th>Created</th><th></th></tr>{rows}</table>")
}

fn error_page(current: &str, err: impl std::fmt::Display) -> Response {
    tracing::error!("admin: failed to load {current}: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        layout("Error", current, "<p>Failed to load data.</p>"),
    )
        .into_response()
}

pub async fn index(_admin: AdminAuth, State(state): State<AppState>) -> Response {
    let users = match UserService::list(state.users.as_ref()).await {
        Ok(users) => users,
        Err(e) => return error_page("/admin/", e),
    };
    let posts = match PostService::list(state.posts.as_ref(), &state.post_cache).await {
        Ok(posts) => posts,
        Err(e) => return error_page("/admin/", e),
    };
    let body = format!(
        "<p>Total users: <strong>{}</strong></p><p>Total posts: <strong>{}</strong></p>",
        users.len(),
        posts.len()
    );
    layout("Overview", "/admin/", &body).into_response()
}

pub async fn users(_admin: AdminAuth, State(state): State<AppState>) -> Response {
    match UserService::list(state.users.as_ref()).await {
        Ok(users) => layout("Users", "/admin/users", &users_table(&users)).into_response(),
        Err(e) => error_page("/admin/users", e),
    }
}

pub async fn posts(_admin: AdminAuth, State(state): State<AppState>) -> Response {
    match PostService::list(state.posts.as_ref(), &state.post_cache).await {
        Ok(posts) => layout("Posts", "/admin/posts", &posts_table(&posts)).into_response(),
        Err(e) => error_page("/admin/posts", e),
    }
}

pub async fn delete_user(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !UserService::delete(state.users.as_ref(), &state.post_cache, id).await? {
        return Err(ApiError::not_found("User not found"));
    }
    Ok(StatusCode::OK)
}

pub async fn delete_post(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    if !PostService::delete(state.posts.as_ref(), &state.post_cache, id).await? {
        return Err(ApiError::not_found("Post not found"));
    }
    Ok(StatusCode::OK)
}
