//! In-memory integration tests for session restore and user administration.

use std::sync::Arc;

use camino::Utf8Path;
use eyre::{WrapErr, ensure, eyre};
use mockable::DefaultClock;
use rstest::rstest;
use taskboard::directory::{
    adapters::memory::InMemoryUserStore,
    domain::Role,
    services::{DirectoryServiceError, UserAdminService},
};
use taskboard::session::{
    adapters::{file::FileTokenStore, memory::InMemoryAuthGateway},
    domain::{Credentials, Registration},
    services::SessionService,
};

use super::helpers::user;

fn session(
    dir: &Utf8Path,
    gateway: &InMemoryAuthGateway,
) -> Result<SessionService<FileTokenStore, InMemoryAuthGateway, DefaultClock>, eyre::Report> {
    let tokens = FileTokenStore::open(dir).wrap_err("open token directory")?;
    Ok(SessionService::new(
        Arc::new(tokens),
        Arc::new(gateway.clone()),
        Arc::new(DefaultClock),
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_session_survives_restart_until_logout() -> Result<(), eyre::Report> {
    let temp = tempfile::tempdir()?;
    let dir = Utf8Path::from_path(temp.path()).ok_or_else(|| eyre!("temp dir is not UTF-8"))?;
    let gateway = InMemoryAuthGateway::new();

    let first = session(dir, &gateway)?;
    let registered = first
        .register(&Registration::new("carol", "carol@example.com", "hunter2")?)
        .await
        .wrap_err("register")?;
    ensure!(registered.is_authenticated(), "registration signs in");
    ensure!(!registered.is_admin(), "new accounts are plain users");

    let restarted = session(dir, &gateway)?;
    let restored = restarted.init().await.wrap_err("restore session")?;
    let restored_user = restored.user().ok_or_else(|| eyre!("session was not restored"))?;
    ensure!(restored_user.username() == "carol", "restored the registered user");
    ensure!(gateway.current_user_calls() == 1, "token verified once");

    restarted.logout().wrap_err("logout")?;
    let after_logout = session(dir, &gateway)?.init().await.wrap_err("init after logout")?;
    ensure!(!after_logout.is_authenticated(), "logout forgets the token");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wrong_password_leaves_session_anonymous() -> Result<(), eyre::Report> {
    let temp = tempfile::tempdir()?;
    let dir = Utf8Path::from_path(temp.path()).ok_or_else(|| eyre!("temp dir is not UTF-8"))?;
    let gateway = InMemoryAuthGateway::new();
    let service = session(dir, &gateway)?;
    service
        .register(&Registration::new("dave", "dave@example.com", "right")?)
        .await
        .wrap_err("register")?;
    service.logout().wrap_err("logout")?;

    let result = service
        .sign_in(&Credentials::new("dave@example.com", "wrong")?)
        .await;

    ensure!(result.is_err(), "wrong password must fail");
    ensure!(!service.state().is_authenticated(), "session stays anonymous");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_promotes_and_removes_users() -> Result<(), eyre::Report> {
    let admin = user("u-admin", "root", Role::Admin)?;
    let alice = user("u-alice", "alice", Role::User)?;
    let bob = user("u-bob", "bob", Role::User)?;
    let store = InMemoryUserStore::new([admin.clone(), alice.clone(), bob.clone()]);
    let service = UserAdminService::new(Arc::new(store.clone()));

    let assignable = service.assignable_users().await.wrap_err("list assignable")?;
    ensure!(assignable.len() == 2, "admins are not assignable");

    let promoted = service
        .update_role(&admin, alice.id(), Role::Admin)
        .await
        .wrap_err("promote alice")?;
    ensure!(promoted.is_admin(), "alice is now an admin");
    ensure!(
        service.users().iter().filter(|cached| cached.is_admin()).count() == 2,
        "cache reflects the promotion"
    );

    let denied = service.delete_user(&bob, admin.id()).await;
    ensure!(
        matches!(denied, Err(DirectoryServiceError::PermissionDenied { .. })),
        "plain users cannot delete accounts"
    );

    service
        .delete_user(&promoted, bob.id())
        .await
        .wrap_err("delete bob")?;
    ensure!(store.users().len() == 2, "bob removed from the store");
    Ok(())
}
