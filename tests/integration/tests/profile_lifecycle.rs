//! User-profile lifecycle tests against a live Keycloak.

use kc_admin_client::{verify_relative_order, ErrorKind, ProfileSchemaManager, RealmManager};

use crate::common::{attributes, unique_realm, TestEnv};

/// Attribute names the server reports, server defaults included.
async fn names(env: &TestEnv, realm: &str) -> anyhow::Result<Vec<String>> {
    let schema = ProfileSchemaManager::new(&env.client).get_schema(realm).await?;
    Ok(schema.attribute_names().into_iter().map(String::from).collect())
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn replace_twice_yields_the_same_schema() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let realm = unique_realm("idempotent");
    RealmManager::new(&env.client).create_realm(&realm).await?;

    let profiles = ProfileSchemaManager::new(&env.client);
    let wanted = attributes(&["username", "email", "custom"]);

    profiles.replace_schema(&realm, &wanted).await?;
    let once = names(&env, &realm).await?;
    profiles.replace_schema(&realm, &wanted).await?;
    let twice = names(&env, &realm).await?;

    assert_eq!(once, twice);
    env.shutdown().await
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn replaced_names_keep_their_relative_order() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let realm = unique_realm("order");
    RealmManager::new(&env.client).create_realm(&realm).await?;

    let profiles = ProfileSchemaManager::new(&env.client);
    let wanted = ["custom", "email", "username", "department"];
    profiles.replace_schema(&realm, &attributes(&wanted)).await?;

    let schema = profiles.get_schema(&realm).await?;
    verify_relative_order(&wanted, &schema)?;
    env.shutdown().await
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn duplicate_names_leave_the_schema_untouched() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let realm = unique_realm("duplicate");
    RealmManager::new(&env.client).create_realm(&realm).await?;

    let before = names(&env, &realm).await?;
    let err = ProfileSchemaManager::new(&env.client)
        .replace_schema(&realm, &attributes(&["username", "email", "email"]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(names(&env, &realm).await?, before);
    env.shutdown().await
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn duplicate_realm_is_a_conflict_and_keeps_its_schema() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let realm = unique_realm("conflict");
    let realms = RealmManager::new(&env.client);
    realms.create_realm(&realm).await?;

    ProfileSchemaManager::new(&env.client)
        .replace_schema(&realm, &attributes(&["username", "email", "custom"]))
        .await?;
    let before = names(&env, &realm).await?;

    let err = realms.create_realm(&realm).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(names(&env, &realm).await?, before);
    env.shutdown().await
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn unknown_realm_schema_is_not_found() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let err = ProfileSchemaManager::new(&env.client)
        .get_schema(&unique_realm("missing"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    env.shutdown().await
}
