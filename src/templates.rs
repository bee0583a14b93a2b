use std::collections::HashSet;

use actix_web::http::StatusCode;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::auth::CurrentUser;
use crate::entities::user::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
use crate::models::{AuthoredMessage, Message, User};

fn layout(title: &str, current: Option<&CurrentUser>, body: &str) -> String {
    let nav = match current {
        Some(current) => format!(
            r#"<li><a href="/users/{id}">@{username}</a></li>
      <li><a href="/messages/new">New Message</a></li>
      <li><a href="/logout">Log out</a></li>"#,
            id = current.user_id,
            username = text(&current.username),
        ),
        None => r#"<li><a href="/signup">Sign up</a></li>
      <li><a href="/login">Log in</a></li>"#
            .to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <nav class="navbar">
    <a href="/" class="navbar-brand">Warbler</a>
    <form action="/users" class="navbar-form">
      <input name="q" placeholder="Search Warbler">
    </form>
    <ul class="nav">
      {nav}
    </ul>
  </nav>
  <main class="container">
{body}
  </main>
</body>
</html>
"#,
        title = text(title),
    )
}

fn error_banner(error: Option<&str>) -> String {
    error
        .map(|e| format!(r#"<div class="alert alert-danger">{}</div>"#, text(e)))
        .unwrap_or_default()
}

fn image_or(url: &Option<String>, default: &str) -> String {
    attr(url.as_deref().unwrap_or(default)).to_string()
}

pub fn error_page(status: StatusCode) -> String {
    let body = format!(
        r#"<div class="error">
  <h1>{code}</h1>
  <p>{reason}</p>
  <a href="/">Back to Warbler</a>
</div>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Something went wrong"),
    );
    layout("Warbler", None, &body)
}

pub fn home_anon() -> String {
    let body = r#"<div class="home-hero">
  <h1>What's Happening?</h1>
  <h4>New to Warbler?</h4>
  <a href="/signup" class="btn btn-primary">Sign up now</a>
</div>"#;
    layout("Warbler", None, body)
}

fn message_item(
    (msg, author): &AuthoredMessage,
    current: Option<&CurrentUser>,
    liked: &HashSet<i32>,
) -> String {
    let like_button = match current {
        Some(current) if current.user_id != author.id => {
            let label = if liked.contains(&msg.id) { "Unlike" } else { "Like" };
            format!(
                r#"<form method="POST" action="/messages/{id}/like" class="messages-like">
        <button class="btn btn-sm">{label}</button>
      </form>"#,
                id = msg.id,
            )
        }
        _ => String::new(),
    };

    format!(
        r#"  <li class="list-group-item">
    <a href="/messages/{id}" class="message-link"></a>
    <a href="/users/{author_id}"><img src="{image}" alt="" class="timeline-image"></a>
    <div class="message-area">
      <a href="/users/{author_id}">@{username}</a>
      <span class="text-muted">{timestamp}</span>
      <p>{body}</p>
      {like_button}
    </div>
  </li>
"#,
        id = msg.id,
        author_id = author.id,
        image = image_or(&author.image_url, DEFAULT_IMAGE_URL),
        username = text(&author.username),
        timestamp = msg.timestamp.format("%d %B %Y"),
        body = text(&msg.text),
    )
}

pub fn home(
    current: &CurrentUser,
    user: &User,
    timeline: &[AuthoredMessage],
    liked: &HashSet<i32>,
) -> String {
    let items: String = timeline
        .iter()
        .map(|entry| message_item(entry, Some(current), liked))
        .collect();

    let body = format!(
        r#"<aside class="user-aside">
  <a href="/users/{id}"><img src="{image}" alt="Image for {username}"></a>
  <h4>@{username}</h4>
</aside>
<ul class="list-group" id="messages">
{items}</ul>"#,
        id = user.id,
        image = image_or(&user.image_url, DEFAULT_IMAGE_URL),
        username = text(&user.username),
    );
    layout("Warbler", Some(current), &body)
}

pub fn signup_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<div class="auth-form">
  <h2 class="join-message">Join Warbler today.</h2>
  {error}
  <form method="POST" id="user_form">
    <input name="username" placeholder="Username" required>
    <input name="email" type="email" placeholder="E-mail" required>
    <input name="password" type="password" placeholder="Password">
    <input name="image_url" placeholder="(Optional) Image URL">
    <button class="btn btn-primary">Sign me up!</button>
  </form>
</div>"#,
        error = error_banner(error),
    );
    layout("Sign up", None, &body)
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        r#"<div class="auth-form">
  <h2 class="join-message">Welcome back.</h2>
  {error}
  <form method="POST" id="user_form">
    <input name="username" placeholder="Username" required>
    <input name="password" type="password" placeholder="Password" required>
    <button class="btn btn-primary">Log in</button>
  </form>
</div>"#,
        error = error_banner(error),
    );
    layout("Log in", None, &body)
}

fn follow_button(user: &User, current: Option<&CurrentUser>, following: &HashSet<i32>) -> String {
    match current {
        Some(current) if current.user_id != user.id => {
            if following.contains(&user.id) {
                format!(
                    r#"<form method="POST" action="/users/stop-following/{id}">
        <button class="btn btn-primary btn-sm">Unfollow</button>
      </form>"#,
                    id = user.id,
                )
            } else {
                format!(
                    r#"<form method="POST" action="/users/follow/{id}">
        <button class="btn btn-outline-primary btn-sm">Follow</button>
      </form>"#,
                    id = user.id,
                )
            }
        }
        _ => String::new(),
    }
}

fn user_cards(users: &[User], current: Option<&CurrentUser>, following: &HashSet<i32>) -> String {
    users
        .iter()
        .map(|user| {
            format!(
                r#"  <div class="card user-card">
    <a href="/users/{id}" class="card-link">
      <img src="{image}" alt="Image for {username}" class="card-image">
      <p>@{username}</p>
    </a>
    {follow}
    <p class="card-bio">{bio}</p>
  </div>
"#,
                id = user.id,
                image = image_or(&user.image_url, DEFAULT_IMAGE_URL),
                username = text(&user.username),
                follow = follow_button(user, current, following),
                bio = text(user.bio.as_deref().unwrap_or_default()),
            )
        })
        .collect()
}

pub fn users_index(
    users: &[User],
    search: Option<&str>,
    current: Option<&CurrentUser>,
    following: &HashSet<i32>,
) -> String {
    let body = if users.is_empty() {
        format!(
            r#"<h3>Sorry, no users found{matching}</h3>"#,
            matching = search
                .map(|q| format!(" matching \"{}\"", text(q)))
                .unwrap_or_default(),
        )
    } else {
        format!(
            "<div class=\"user-cards\">\n{}</div>",
            user_cards(users, current, following)
        )
    };
    layout("Users", current, &body)
}

/// Counts shown in the profile header.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileStats {
    pub messages: usize,
    pub following: usize,
    pub followers: usize,
    pub likes: usize,
}

fn profile_header(user: &User, stats: ProfileStats, current: Option<&CurrentUser>, following: &HashSet<i32>) -> String {
    let own_controls = match current {
        Some(current) if current.user_id == user.id => r#"<a href="/users/profile" class="btn btn-outline-secondary">Edit Profile</a>
      <form method="POST" action="/users/delete" class="form-inline">
        <button class="btn btn-outline-danger">Delete Profile</button>
      </form>"#
            .to_string(),
        _ => follow_button(user, current, following),
    };

    format!(
        r#"<div id="warbler-hero" style="background-image: url('{header}')"></div>
<img src="{image}" alt="Image for {username}" id="profile-avatar">
<div class="profile-header">
  <h4 id="sidebar-username">@{username}</h4>
  <p class="user-location">{location}</p>
  <p class="user-bio">{bio}</p>
  <ul class="user-stats nav nav-pills">
    <li class="stat"><p class="small">Messages</p><h4><a href="/users/{id}">{messages}</a></h4></li>
    <li class="stat"><p class="small">Following</p><h4><a href="/users/{id}/following">{following}</a></h4></li>
    <li class="stat"><p class="small">Followers</p><h4><a href="/users/{id}/followers">{followers}</a></h4></li>
    <li class="stat"><p class="small">Likes</p><h4><a href="/users/{id}/likes">{likes}</a></h4></li>
  </ul>
  {own_controls}
</div>
"#,
        id = user.id,
        header = image_or(&user.header_image_url, DEFAULT_HEADER_IMAGE_URL),
        image = image_or(&user.image_url, DEFAULT_IMAGE_URL),
        username = text(&user.username),
        location = text(user.location.as_deref().unwrap_or_default()),
        bio = text(user.bio.as_deref().unwrap_or_default()),
        messages = stats.messages,
        following = stats.following,
        followers = stats.followers,
        likes = stats.likes,
    )
}

pub struct ProfilePage<'a> {
    pub user: &'a User,
    pub stats: ProfileStats,
    pub current: Option<&'a CurrentUser>,
    /// Ids the viewer follows.
    pub viewer_following: &'a HashSet<i32>,
    /// Ids of messages the viewer liked.
    pub viewer_likes: &'a HashSet<i32>,
}

fn authored(messages: &[Message], author: &User) -> Vec<AuthoredMessage> {
    messages.iter().map(|m| (m.clone(), author.clone())).collect()
}

pub fn user_detail(page: &ProfilePage<'_>, messages: &[Message]) -> String {
    let items: String = authored(messages, page.user)
        .iter()
        .map(|entry| message_item(entry, page.current, page.viewer_likes))
        .collect();

    let body = format!(
        "{header}<ul class=\"list-group\" id=\"messages\">\n{items}</ul>",
        header = profile_header(page.user, page.stats, page.current, page.viewer_following),
    );
    layout(&format!("@{}", page.user.username), page.current, &body)
}

/// Followers or following list for the profile in `page`.
pub fn user_list(page: &ProfilePage<'_>, users: &[User]) -> String {
    let body = format!(
        "{header}<div class=\"user-cards\">\n{cards}</div>",
        header = profile_header(page.user, page.stats, page.current, page.viewer_following),
        cards = user_cards(users, page.current, page.viewer_following),
    );
    layout(&format!("@{}", page.user.username), page.current, &body)
}

pub fn liked_messages(page: &ProfilePage<'_>, liked: &[AuthoredMessage]) -> String {
    let items: String = liked
        .iter()
        .map(|entry| message_item(entry, page.current, page.viewer_likes))
        .collect();

    let body = format!(
        "{header}<ul class=\"list-group\" id=\"messages\">\n{items}</ul>",
        header = profile_header(page.user, page.stats, page.current, page.viewer_following),
    );
    layout(&format!("@{}", page.user.username), page.current, &body)
}

pub fn edit_profile(user: &User, current: &CurrentUser, error: Option<&str>) -> String {
    let value = |v: &Option<String>| attr(v.as_deref().unwrap_or_default()).to_string();

    let body = format!(
        r#"<div class="auth-form">
  <h2 class="join-message">Edit Your Profile.</h2>
  {error}
  <form method="POST" id="user_form">
    <input name="username" value="{username}" required>
    <input name="email" type="email" value="{email}" required>
    <input name="image_url" value="{image_url}" placeholder="(Optional) Image URL">
    <input name="header_image_url" value="{header_image_url}" placeholder="(Optional) Header Image URL">
    <textarea name="bio" placeholder="(Optional) Tell us about yourself">{bio}</textarea>
    <input name="location" value="{location}" placeholder="(Optional) Location">
    <p>To confirm changes, enter your password:</p>
    <input name="password" type="password" placeholder="Password" required>
    <button class="btn btn-success">Edit this user!</button>
    <a href="/users/{id}" class="btn btn-outline-secondary">Cancel</a>
  </form>
</div>"#,
        error = error_banner(error),
        id = user.id,
        username = attr(&user.username),
        email = attr(&user.email),
        image_url = value(&user.image_url),
        header_image_url = value(&user.header_image_url),
        bio = text(user.bio.as_deref().unwrap_or_default()),
        location = value(&user.location),
    );
    layout("Edit Profile", Some(current), &body)
}

pub fn new_message(current: &CurrentUser, error: Option<&str>) -> String {
    let body = format!(
        r#"<div class="message-form">
  {error}
  <form method="POST">
    <textarea name="text" rows="3" maxlength="140" placeholder="What's happening?"></textarea>
    <button class="btn btn-outline-success">Add my message!</button>
  </form>
</div>"#,
        error = error_banner(error),
    );
    layout("New Message", Some(current), &body)
}

pub fn message_detail(entry: &AuthoredMessage, current: Option<&CurrentUser>, liked: &HashSet<i32>) -> String {
    let (msg, author) = entry;
    let delete_button = match current {
        Some(current) if current.user_id == author.id => format!(
            r#"<form method="POST" action="/messages/{id}/delete">
    <button class="btn btn-outline-danger">Delete</button>
  </form>"#,
            id = msg.id,
        ),
        _ => String::new(),
    };

    let body = format!(
        r#"<div class="message-detail">
<ul class="list-group">
{item}</ul>
  {delete_button}
</div>"#,
        item = message_item(entry, current, liked),
    );
    layout("Warbler", current, &body)
}
