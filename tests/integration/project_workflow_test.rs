//! Project Workflow Integration Tests
//!
//! Runs a project from creation through task assignment to publishing on a
//! bootstrapped in-memory broker.

use chrono::{Duration, Utc};

use cms_broker::{PrincipalBroker, ProjectBroker, TaskBroker};
use cms_common::Error;
use cms_projects::{ProjectState, ProjectType};
use cms_tasks::{NewTask, TaskLogType, TaskPriority, TaskState};

use crate::common::TestCms;

mod common;

#[test_log::test(tokio::test)]
async fn test_bootstrap_creates_well_known_principals() {
    let cms = TestCms::new().await.unwrap();
    let admin = cms.admin().await.unwrap();

    let admin_group = cms
        .broker
        .read_group_by_name(&cms.config.admin_group)
        .await
        .unwrap();
    assert!(admin_group.is_project_manager());
    assert!(cms
        .broker
        .user_in_group(admin.id, admin_group.id)
        .await
        .unwrap());

    // Admins inherit the users group
    let users = cms
        .broker
        .read_group_by_name(&cms.config.users_group)
        .await
        .unwrap();
    assert!(cms.broker.user_in_group(admin.id, users.id).await.unwrap());

    let online = cms
        .broker
        .read_project_by_name(&cms.config.online_project)
        .await
        .unwrap();
    assert_eq!(online.owner_id, admin.id);
    assert_eq!(online.state, ProjectState::Unlocked);
}

#[test_log::test(tokio::test)]
async fn test_project_task_workflow_e2e() {
    let cms = TestCms::new().await.unwrap();
    let admin = cms.admin().await.unwrap();
    let alice = cms.create_editor("alice", "Editors").await.unwrap();
    let bob = cms.create_editor("bob", "Editors").await.unwrap();
    let editors = cms.broker.read_group_by_name("Editors").await.unwrap();

    // Step 1: a project manager sets up the project
    let mut project = cms
        .broker
        .create_project(
            "Spring campaign",
            "Landing pages for the spring campaign",
            admin.id,
            "Editors",
            &cms.config.project_manager_group,
            ProjectType::Normal,
        )
        .await
        .unwrap();

    let visible: Vec<String> = cms
        .broker
        .get_all_accessible_projects_by_user(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert!(visible.contains(&"Spring campaign".to_string()));
    assert!(cms
        .broker
        .get_all_manageable_projects(alice.id)
        .await
        .unwrap()
        .iter()
        .all(|p| p.name != "Spring campaign"));

    // Step 2: the root task goes to alice
    let root = cms
        .broker
        .create_task(NewTask {
            name: "Write landing page".to_string(),
            project_id: project.id,
            parent_id: None,
            root_id: None,
            initiator_user_id: admin.id,
            agent_user_id: alice.id,
            role_group_id: editors.id,
            priority: TaskPriority::High,
            wakeup_time: None,
            timeout: Utc::now() + Duration::days(7),
        })
        .await
        .unwrap();
    assert_eq!(root.state, TaskState::Started);
    project = cms.broker.read_project(project.id).await.unwrap();
    assert_eq!(project.task_id, Some(root.id));

    // Step 3: alice forwards a sub task to bob, who finishes it
    let mut review = cms
        .broker
        .create_task(NewTask {
            name: "Review copy".to_string(),
            project_id: project.id,
            parent_id: Some(root.id),
            root_id: None,
            initiator_user_id: alice.id,
            agent_user_id: alice.id,
            role_group_id: editors.id,
            priority: TaskPriority::Normal,
            wakeup_time: None,
            timeout: Utc::now() + Duration::days(2),
        })
        .await
        .unwrap();
    assert_eq!(review.root_id, root.id);

    review.forward(bob.id, editors.id).unwrap();
    cms.broker.write_task(&review).await.unwrap();
    cms.broker
        .write_task_log(review.id, alice.id, "Please check the headline", TaskLogType::Note)
        .await
        .unwrap();

    let bobs = cms
        .broker
        .read_tasks_for_user(bob.id, Some(TaskState::Started))
        .await
        .unwrap();
    assert_eq!(bobs.len(), 1);

    review.end().unwrap();
    cms.broker.write_task(&review).await.unwrap();
    cms.broker
        .write_task_log(review.id, bob.id, "Done", TaskLogType::System)
        .await
        .unwrap();

    let logs = cms.broker.read_task_logs(review.id).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[1].comment, "Done");
    assert!(cms
        .broker
        .read_tasks_for_user(bob.id, Some(TaskState::Started))
        .await
        .unwrap()
        .is_empty());

    // Step 4: lock, unlock and publish the project
    project.lock().unwrap();
    cms.broker.write_project(&project).await.unwrap();
    project.unlock().unwrap();
    cms.broker.write_project(&project).await.unwrap();
    project.publish(admin.id).unwrap();
    cms.broker.write_project(&project).await.unwrap();

    let archived = cms.broker.read_project(project.id).await.unwrap();
    assert_eq!(archived.state, ProjectState::Archived);
    assert_eq!(archived.published_by, Some(admin.id));

    // Archived projects disappear from the lists and reject writes
    assert!(cms
        .broker
        .get_all_accessible_projects_by_user(alice.id)
        .await
        .unwrap()
        .iter()
        .all(|p| p.id != project.id));
    assert!(matches!(
        cms.broker.write_project(&archived).await,
        Err(Error::AccessDenied(_))
    ));
}

#[test_log::test(tokio::test)]
async fn test_disabling_group_revokes_project_access() {
    let cms = TestCms::new().await.unwrap();
    let admin = cms.admin().await.unwrap();
    let carol = cms.create_editor("carol", "Translators").await.unwrap();

    cms.broker
        .create_project(
            "Translations",
            "",
            admin.id,
            "Translators",
            &cms.config.admin_group,
            ProjectType::Temporary,
        )
        .await
        .unwrap();
    assert_eq!(
        cms.broker
            .get_all_accessible_projects_by_user(carol.id)
            .await
            .unwrap()
            .iter()
            .filter(|p| p.name == "Translations")
            .count(),
        1
    );

    let mut translators = cms.broker.read_group_by_name("Translators").await.unwrap();
    translators.disable();
    cms.broker.write_group(&translators).await.unwrap();

    // The disabled group no longer grants the project nor the users group
    let projects = cms
        .broker
        .get_all_accessible_projects_by_user(carol.id)
        .await
        .unwrap();
    assert!(projects.is_empty());
    assert!(cms
        .broker
        .get_groups_of_user(carol.id)
        .await
        .unwrap()
        .is_empty());
}
