//! Resource Handler Integration Tests
//!
//! Drives the built-in resource type handlers through the registry against
//! a shared in-memory facade, with two users working on one project.

use cms_broker::{PropertyBroker, ProjectBroker};
use cms_common::Error;
use cms_projects::ProjectType;
use cms_resources::{
    BinaryHandler, CmsObject, FacadeCall, ImageHandler, InMemoryCmsObject, JspHandler,
    Properties, RequestContext, ResourceTypeHandler, ResourceTypeRegistry,
};

use crate::common::TestCms;

mod common;

#[test_log::test(tokio::test)]
async fn test_create_resources_of_every_builtin_type() {
    let cms = TestCms::new().await.unwrap();
    let alice = cms.create_editor("alice", "Editors").await.unwrap();
    let project = cms
        .broker
        .create_project(
            "Assets",
            "",
            alice.id,
            "Editors",
            "Editors",
            ProjectType::Normal,
        )
        .await
        .unwrap();

    let registry = ResourceTypeRegistry::with_defaults();
    let facade = InMemoryCmsObject::new(RequestContext::new(alice.id, project.id));

    let cases = [
        ("jsp", "/templates/home.jsp", JspHandler::TYPE_ID),
        ("image", "/images/logo.png", ImageHandler::TYPE_ID),
        ("binary", "/downloads/manual.pdf", BinaryHandler::TYPE_ID),
    ];

    for (type_name, path, type_id) in cases {
        let file = registry
            .create_resource(&facade, type_name, path, &Properties::new(), b"data")
            .await
            .unwrap();
        assert_eq!(file.type_id, type_id);
        assert_eq!(file.project_id, project.id);
        assert!(file.is_locked_by(alice.id));
    }

    assert_eq!(facade.resource_count().await, 3);

    // Every create is followed by a lock on the same resource
    let calls = facade.calls().await;
    assert_eq!(calls.len(), 6);
    for pair in calls.chunks(2) {
        match (&pair[0], &pair[1]) {
            (FacadeCall::CreateFile { name, .. }, FacadeCall::Lock { name: locked, force }) => {
                assert_eq!(name, locked);
                assert!(!force);
            }
            other => panic!("unexpected call sequence: {:?}", other),
        }
    }
}

#[test_log::test(tokio::test)]
async fn test_lock_conflict_between_users() {
    let cms = TestCms::new().await.unwrap();
    let alice = cms.create_editor("alice", "Editors").await.unwrap();
    let bob = cms.create_editor("bob", "Editors").await.unwrap();
    let project = cms
        .broker
        .create_project(
            "Shared",
            "",
            alice.id,
            "Editors",
            "Editors",
            ProjectType::Normal,
        )
        .await
        .unwrap();

    let registry = ResourceTypeRegistry::with_defaults();
    let as_alice = InMemoryCmsObject::new(RequestContext::new(alice.id, project.id));
    let as_bob = as_alice.for_context(RequestContext::new(bob.id, project.id));

    let mut props = Properties::new();
    props.insert("Title".to_string(), "Home".to_string());
    registry
        .create_resource(&as_alice, "jsp", "/index.jsp", &props, b"<html/>")
        .await
        .unwrap();

    // Bob cannot write or lock while alice holds the lock
    let handler = registry.get_by_name("jsp").unwrap();
    assert!(matches!(
        handler
            .write_property(&as_bob, "/index.jsp", "Title", "Start")
            .await,
        Err(Error::Locked(_))
    ));
    assert!(matches!(
        as_bob.lock_resource("/index.jsp", false).await,
        Err(Error::Locked(_))
    ));

    // Copying needs no lock on the source; the copy is bob's
    let copy = handler
        .copy_resource(&as_bob, "/index.jsp", "/index-copy.jsp")
        .await
        .unwrap();
    assert!(copy.is_locked_by(bob.id));
    assert_eq!(copy.properties.get("Title").map(String::as_str), Some("Home"));

    // A forced lock takes over
    as_bob.lock_resource("/index.jsp", true).await.unwrap();
    handler
        .write_property(&as_bob, "/index.jsp", "Title", "Start")
        .await
        .unwrap();
    assert_eq!(
        as_alice
            .read_property("/index.jsp", "Title")
            .await
            .unwrap()
            .as_deref(),
        Some("Start")
    );
    assert!(matches!(
        as_alice.unlock_resource("/index.jsp").await,
        Err(Error::Locked(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_change_type_and_property_definitions() {
    let cms = TestCms::new().await.unwrap();
    let alice = cms.create_editor("alice", "Editors").await.unwrap();
    let project = cms
        .broker
        .create_project(
            "Media",
            "",
            alice.id,
            "Editors",
            "Editors",
            ProjectType::Normal,
        )
        .await
        .unwrap();

    let registry = ResourceTypeRegistry::with_defaults();
    let facade = InMemoryCmsObject::new(RequestContext::new(alice.id, project.id));

    for name in ["Title", "AltText"] {
        cms.broker
            .create_property_definition(name, ImageHandler::TYPE_ID)
            .await
            .unwrap();
    }
    let defined: Vec<String> = cms
        .broker
        .read_all_property_definitions(ImageHandler::TYPE_ID)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(defined, vec!["AltText", "Title"]);

    registry
        .create_resource(&facade, "binary", "/media/photo.jpg", &Properties::new(), b"\xff\xd8")
        .await
        .unwrap();
    let changed = registry
        .change_type(&facade, "/media/photo.jpg", "image")
        .await
        .unwrap();
    assert_eq!(changed.type_id, ImageHandler::TYPE_ID);

    assert!(matches!(
        registry.change_type(&facade, "/media/photo.jpg", "video").await,
        Err(Error::NotFound(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_online_project_is_read_only() {
    let cms = TestCms::new().await.unwrap();
    let admin = cms.admin().await.unwrap();
    let online = cms
        .broker
        .read_project_by_name(&cms.config.online_project)
        .await
        .unwrap();

    let registry = ResourceTypeRegistry::with_defaults();
    let facade = InMemoryCmsObject::new(RequestContext::online(admin.id, online.id));

    let result = registry
        .create_resource(&facade, "jsp", "/index.jsp", &Properties::new(), b"")
        .await;
    assert!(matches!(result, Err(Error::AccessDenied(_))));
    assert_eq!(facade.resource_count().await, 0);
}
