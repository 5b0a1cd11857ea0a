//! Sign-in, sign-out, profile and the navigation menu.

use std::io::{BufRead, Write};

use anyhow::Context as _;
use clap::Args;
use serde_json::json;
use stockdesk_core::navigation::{self, DASHBOARD_HOME};
use stockdesk_core::routing::{self, RouteDecision, LOGIN_PATH};
use stockdesk_core::{validation, PermissionSet};

use super::Context;
use crate::output::{date, or_dash, render_table, yes_no};

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Password; prompted on stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

pub async fn login(ctx: &Context, args: LoginArgs) -> anyhow::Result<()> {
    ctx.client.set_location(LOGIN_PATH);
    let session = ctx.client.session();

    if let RouteDecision::Redirect { to, .. } = routing::guard(LOGIN_PATH, session.has_refresh_token()?)
    {
        ctx.out.message(&format!(
            "Already signed in. Continue at {}, or run `stockdesk logout` first.",
            to
        ));
        return Ok(());
    }

    let password = match args.password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let request = validation::login_request(&args.email, &password)?;
    let auth = ctx.client.auth().login(&request).await?;

    let destination = session
        .take_redirect_after_login()?
        .unwrap_or_else(|| DASHBOARD_HOME.to_string());
    let name = auth
        .user
        .as_ref()
        .map_or(request.email.as_str(), |user| user.name.as_str());

    ctx.out.done(
        &json!({ "user": auth.user, "redirectTo": destination }),
        &format!("Signed in as {}. Continue at {}.", name, destination),
    )
}

pub fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.client.auth().logout()?;
    ctx.out.done(&json!({ "signedOut": true }), "Signed out.")
}

pub async fn whoami(ctx: &Context) -> anyhow::Result<()> {
    ctx.client.set_location(DASHBOARD_HOME);
    let profile = ctx.client.auth().profile().await?;
    let user = &profile.user;

    let mut permissions = profile.permissions.clone();
    permissions.sort();

    ctx.out.record(
        &profile,
        vec![
            ("Name", user.name.clone()),
            ("Email", user.email.clone()),
            ("Role", or_dash(user.role.as_ref().map(|r| r.name.as_str()))),
            ("Active", yes_no(user.is_active)),
            ("Last login", date(user.last_login.as_ref())),
            ("Permissions", permissions.join(", ")),
        ],
    )
}

/// The sidebar as the signed-in user sees it.
pub async fn nav(ctx: &Context, pathname: &str) -> anyhow::Result<()> {
    ctx.client.set_location(pathname);
    let permissions = ctx.client.auth().permissions().await?;
    let sections = navigation::visible_sections(&permissions);

    if ctx.out.is_json() {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }
    println!("{}", render_nav(&permissions, pathname));
    Ok(())
}

fn render_nav(permissions: &PermissionSet, pathname: &str) -> String {
    let rows = navigation::visible_sections(permissions)
        .into_iter()
        .flat_map(|section| {
            section.entries.into_iter().map(move |entry| {
                vec![
                    section.title.to_string(),
                    entry.name.to_string(),
                    entry.href.to_string(),
                    if entry.is_active(pathname) { "*" } else { "" }.to_string(),
                ]
            })
        })
        .collect();
    render_table(&["Section", "Page", "Path", "Active"], rows)
}

pub async fn refresh(ctx: &Context) -> anyhow::Result<()> {
    ctx.client.auth().refresh().await?;
    ctx.out.done(&json!({ "renewed": true }), "Session renewed.")
}

fn prompt(label: &str) -> anyhow::Result<String> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", label)?;
    stderr.flush()?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
