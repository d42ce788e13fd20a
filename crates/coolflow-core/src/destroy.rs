//! Project teardown
//!
//! Stops and deletes every application, database and service of a project,
//! waits for Coolify to forget them, then deletes the project itself.
//! Per-resource failures are collected; only the final project deletion is
//! fatal.

use crate::error::{CoreError, Result};
use crate::poll::{PollOutcome, PollPolicy};
use coolflow_client::{
    Application, CoolifyClient, Database, DeleteOptions, Project, Service,
};
use std::collections::HashSet;
use std::time::Duration;

/// Kinds of resources a project owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Application,
    Database,
    Service,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Application => write!(f, "application"),
            ResourceKind::Database => write!(f, "database"),
            ResourceKind::Service => write!(f, "service"),
        }
    }
}

/// Resources that belong to a project environment
pub trait EnvironmentScoped {
    fn environment_id(&self) -> Option<u64>;
}

impl EnvironmentScoped for Application {
    fn environment_id(&self) -> Option<u64> {
        self.environment_id
    }
}

impl EnvironmentScoped for Database {
    fn environment_id(&self) -> Option<u64> {
        self.environment_id
    }
}

impl EnvironmentScoped for Service {
    fn environment_id(&self) -> Option<u64> {
        self.environment_id
    }
}

/// Keep the items whose environment is one of `environment_ids`.
///
/// Items without an environment are dropped.
pub fn filter_by_environment<T: EnvironmentScoped>(
    items: Vec<T>,
    environment_ids: &[u64],
) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| {
            item.environment_id()
                .is_some_and(|id| environment_ids.contains(&id))
        })
        .collect()
}

/// Two-step confirmation gate
pub trait Confirm {
    /// Yes/no question
    fn confirm(&self, question: &str) -> bool;

    /// Free text answer; `None` when no answer could be read
    fn input(&self, prompt: &str) -> Option<String>;
}

/// Outcome of one stop or delete call, with the API error message
pub type ActionResult = std::result::Result<(), String>;

/// Progress hooks; every method defaults to doing nothing
pub trait DestroyObserver {
    fn on_plan(&self, _plan: &DestroyPlan) {}
    fn on_stop(&self, _kind: ResourceKind, _name: &str, _result: &ActionResult) {}
    fn on_grace_period(&self, _period: Duration) {}
    fn on_delete(&self, _item: &BatchItem) {}
    fn on_poll(&self, _attempt: u32, _remaining: usize) {}
    fn on_project_deleted(&self, _project: &Project) {}
}

/// Observer that reports nothing
pub struct SilentObserver;

impl DestroyObserver for SilentObserver {}

/// What a destroy run is about to remove
#[derive(Debug, Clone, Default)]
pub struct DestroyPlan {
    pub project: Project,
    pub applications: Vec<Application>,
    pub databases: Vec<Database>,
    pub services: Vec<Service>,
}

impl DestroyPlan {
    pub fn total(&self) -> usize {
        self.applications.len() + self.databases.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Outcome of one delete call
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    pub kind: ResourceKind,
    pub uuid: String,
    pub name: String,
    pub result: ActionResult,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub fn push(&mut self, item: BatchItem) {
        self.items.push(item);
    }

    pub fn succeeded(&self, kind: ResourceKind) -> usize {
        self.items
            .iter()
            .filter(|i| i.kind == kind && i.result.is_ok())
            .count()
    }

    pub fn failures(&self) -> Vec<BatchItem> {
        self.items
            .iter()
            .filter(|i| i.result.is_err())
            .cloned()
            .collect()
    }

    /// UUIDs whose delete call succeeded
    pub fn deleted_uuids(&self) -> HashSet<String> {
        self.items
            .iter()
            .filter(|i| i.result.is_ok())
            .map(|i| i.uuid.clone())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct DestroyOptions {
    /// Skip the confirmation gate
    pub force: bool,
    /// Wait between stopping and deleting
    pub grace_period: Duration,
    pub poll: PollPolicy,
    pub delete: DeleteOptions,
}

impl Default for DestroyOptions {
    fn default() -> Self {
        Self {
            force: false,
            grace_period: Duration::from_secs(5),
            poll: PollPolicy::resource_deletion(),
            delete: DeleteOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DestroyReport {
    pub project: Project,
    pub deleted_applications: usize,
    pub deleted_databases: usize,
    pub deleted_services: usize,
    pub failures: Vec<BatchItem>,
    /// `None` when there was nothing to wait for
    pub poll: Option<PollOutcome>,
}

#[derive(Debug, Clone)]
pub enum DestroyOutcome {
    Cancelled,
    Destroyed(DestroyReport),
}

pub struct Destroyer<'a> {
    client: &'a CoolifyClient,
    options: DestroyOptions,
}

impl<'a> Destroyer<'a> {
    pub fn new(client: &'a CoolifyClient, options: DestroyOptions) -> Self {
        Self { client, options }
    }

    /// Resolve the project and the resources of its environments
    pub async fn plan(&self, project_uuid: &str) -> Result<DestroyPlan> {
        let project = self.client.projects().get(project_uuid).await?;
        let (applications, databases, services) = fetch_scoped(self.client, &project).await?;
        Ok(DestroyPlan {
            project,
            applications,
            databases,
            services,
        })
    }

    pub async fn run(
        &self,
        project_uuid: &str,
        confirm: &dyn Confirm,
        observer: &dyn DestroyObserver,
    ) -> Result<DestroyOutcome> {
        let plan = self.plan(project_uuid).await?;
        observer.on_plan(&plan);

        if !self.options.force && !passes_gate(&plan, confirm) {
            tracing::info!("Destroy of project {} cancelled", project_uuid);
            return Ok(DestroyOutcome::Cancelled);
        }

        let fresh = self.client.fresh();
        let mut batch = BatchReport::default();
        let mut poll = None;

        if !plan.is_empty() {
            // state may have changed while waiting for confirmation
            let (applications, databases, services) = fetch_scoped(&fresh, &plan.project).await?;

            self.stop_all(&fresh, &applications, &databases, &services, observer)
                .await;

            if !self.options.grace_period.is_zero() {
                observer.on_grace_period(self.options.grace_period);
                tokio::time::sleep(self.options.grace_period).await;
            }

            self.delete_all(&fresh, &applications, &databases, &services, &mut batch, observer)
                .await;

            poll = Some(self.wait_until_gone(&fresh, &batch.deleted_uuids(), observer).await);
        }

        fresh
            .projects()
            .delete(&plan.project.uuid)
            .await
            .map_err(|source| CoreError::ProjectDeletion {
                uuid: plan.project.uuid.clone(),
                source,
            })?;
        tracing::info!("Deleted project {} ({})", plan.project.name, plan.project.uuid);
        observer.on_project_deleted(&plan.project);

        Ok(DestroyOutcome::Destroyed(DestroyReport {
            deleted_applications: batch.succeeded(ResourceKind::Application),
            deleted_databases: batch.succeeded(ResourceKind::Database),
            deleted_services: batch.succeeded(ResourceKind::Service),
            failures: batch.failures(),
            project: plan.project,
            poll,
        }))
    }

    async fn stop_all(
        &self,
        client: &CoolifyClient,
        applications: &[Application],
        databases: &[Database],
        services: &[Service],
        observer: &dyn DestroyObserver,
    ) {
        for app in applications {
            let result = client.applications().stop(&app.uuid).await;
            report_stop(ResourceKind::Application, &app.uuid, &app.name, result, observer);
        }
        for db in databases {
            let result = client.databases().stop(&db.uuid).await;
            report_stop(ResourceKind::Database, &db.uuid, &db.name, result, observer);
        }
        for service in services {
            let result = client.services().stop(&service.uuid).await;
            report_stop(ResourceKind::Service, &service.uuid, &service.name, result, observer);
        }
    }

    async fn delete_all(
        &self,
        client: &CoolifyClient,
        applications: &[Application],
        databases: &[Database],
        services: &[Service],
        batch: &mut BatchReport,
        observer: &dyn DestroyObserver,
    ) {
        let options = self.options.delete;
        for app in applications {
            let result = client.applications().delete(&app.uuid, options).await;
            record(batch, ResourceKind::Application, &app.uuid, &app.name, result, observer);
        }
        for db in databases {
            let result = client.databases().delete(&db.uuid, options).await;
            record(batch, ResourceKind::Database, &db.uuid, &db.name, result, observer);
        }
        for service in services {
            let result = client.services().delete(&service.uuid, options).await;
            record(batch, ResourceKind::Service, &service.uuid, &service.name, result, observer);
        }
    }

    /// Poll the list endpoints until none of `deleted` is listed anymore
    async fn wait_until_gone(
        &self,
        client: &CoolifyClient,
        deleted: &HashSet<String>,
        observer: &dyn DestroyObserver,
    ) -> PollOutcome {
        if deleted.is_empty() {
            return PollOutcome::Completed { attempts: 0 };
        }

        let outcome = self
            .options
            .poll
            .run(move |attempt| async move {
                match remaining(client, deleted).await {
                    Ok(count) => {
                        observer.on_poll(attempt, count);
                        count == 0
                    }
                    Err(e) => {
                        tracing::warn!("Listing resources failed while waiting: {}", e);
                        false
                    }
                }
            })
            .await;

        if !outcome.is_completed() {
            tracing::warn!(
                "Resources still listed after {} checks, deleting project anyway",
                outcome.attempts()
            );
        }
        outcome
    }
}

fn passes_gate(plan: &DestroyPlan, confirm: &dyn Confirm) -> bool {
    let question = format!(
        "Destroy project '{}' and its {} resource(s)?",
        plan.project.name,
        plan.total()
    );
    if !confirm.confirm(&question) {
        return false;
    }

    let prompt = format!("Type the project name ({}) to confirm", plan.project.name);
    confirm
        .input(&prompt)
        .is_some_and(|answer| answer.trim() == plan.project.name)
}

async fn fetch_scoped(
    client: &CoolifyClient,
    project: &Project,
) -> Result<(Vec<Application>, Vec<Database>, Vec<Service>)> {
    let ids = project.environment_ids();
    let applications = filter_by_environment(client.applications().all().await?, &ids);
    let databases = filter_by_environment(client.databases().all().await?, &ids);
    let services = filter_by_environment(client.services().all().await?, &ids);
    Ok((applications, databases, services))
}

async fn remaining(client: &CoolifyClient, deleted: &HashSet<String>) -> Result<usize> {
    let applications = client.applications().all().await?;
    let databases = client.databases().all().await?;
    let services = client.services().all().await?;

    let listed = applications
        .iter()
        .map(|a| &a.uuid)
        .chain(databases.iter().map(|d| &d.uuid))
        .chain(services.iter().map(|s| &s.uuid))
        .filter(|uuid| deleted.contains(*uuid))
        .count();
    Ok(listed)
}

fn report_stop<T>(
    kind: ResourceKind,
    uuid: &str,
    name: &str,
    result: coolflow_client::Result<T>,
    observer: &dyn DestroyObserver,
) {
    let result = result.map(|_| ()).map_err(|e| {
        tracing::warn!("Failed to stop {} {}: {}", kind, uuid, e);
        e.to_string()
    });
    observer.on_stop(kind, name, &result);
}

fn record(
    batch: &mut BatchReport,
    kind: ResourceKind,
    uuid: &str,
    name: &str,
    result: coolflow_client::Result<()>,
    observer: &dyn DestroyObserver,
) {
    let result = result.map_err(|e| {
        tracing::warn!("Failed to delete {} {}: {}", kind, uuid, e);
        e.to_string()
    });
    let item = BatchItem {
        kind,
        uuid: uuid.to_string(),
        name: name.to_string(),
        result,
    };
    observer.on_delete(&item);
    batch.push(item);
}

#[cfg(test)]
mod tests {
    use super::*;
    use coolflow_client::ClientConfig;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Answers {
        yes: bool,
        name: Option<&'static str>,
        asked: RefCell<Vec<String>>,
    }

    impl Answers {
        fn new(yes: bool, name: Option<&'static str>) -> Self {
            Self {
                yes,
                name,
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl Confirm for Answers {
        fn confirm(&self, question: &str) -> bool {
            self.asked.borrow_mut().push(question.to_string());
            self.yes
        }

        fn input(&self, prompt: &str) -> Option<String> {
            self.asked.borrow_mut().push(prompt.to_string());
            self.name.map(str::to_string)
        }
    }

    fn client(server: &MockServer) -> CoolifyClient {
        CoolifyClient::new(
            ClientConfig::new(server.uri(), "t")
                .with_cache_ttl(Duration::ZERO)
                .with_retry(0, Duration::ZERO),
        )
        .unwrap()
    }

    fn quick(force: bool, max_attempts: u32) -> DestroyOptions {
        DestroyOptions {
            force,
            grace_period: Duration::ZERO,
            poll: PollPolicy::new(max_attempts, Duration::from_millis(1)),
            delete: DeleteOptions::default(),
        }
    }

    async fn mount_json(server: &MockServer, verb: &str, route: &str, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    /// First `listings` calls return `first`, later calls return an empty list
    async fn mount_list(server: &MockServer, route: &str, first: Value, listings: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(first))
            .up_to_n_times(listings)
            .mount(server)
            .await;
        mount_json(server, "GET", route, json!([])).await;
    }

    fn deleted() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"}))
    }

    async fn mount_project(server: &MockServer) {
        mount_json(
            server,
            "GET",
            "/api/v1/projects/p1",
            json!({
                "uuid": "p1",
                "name": "shop",
                "environments": [{"id": 1, "name": "production"}]
            }),
        )
        .await;
    }

    #[test]
    fn test_filter_never_leaks_across_projects() {
        let apps = vec![
            Application {
                uuid: "mine".into(),
                environment_id: Some(1),
                ..Default::default()
            },
            Application {
                uuid: "other-project".into(),
                environment_id: Some(2),
                ..Default::default()
            },
            Application {
                uuid: "no-env".into(),
                ..Default::default()
            },
        ];
        let kept = filter_by_environment(apps, &[1, 3]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].uuid, "mine");
        assert!(filter_by_environment(Vec::<Service>::new(), &[1]).is_empty());
    }

    #[test]
    fn test_batch_report_tallies() {
        let mut batch = BatchReport::default();
        for (kind, uuid, ok) in [
            (ResourceKind::Application, "a1", true),
            (ResourceKind::Application, "a2", false),
            (ResourceKind::Database, "d1", true),
        ] {
            batch.push(BatchItem {
                kind,
                uuid: uuid.into(),
                name: uuid.into(),
                result: if ok { Ok(()) } else { Err("boom".into()) },
            });
        }
        assert_eq!(batch.succeeded(ResourceKind::Application), 1);
        assert_eq!(batch.succeeded(ResourceKind::Database), 1);
        assert_eq!(batch.failures().len(), 1);
        assert_eq!(batch.deleted_uuids().len(), 2);
    }

    #[tokio::test]
    async fn test_forced_destroy_tallies_apps_and_databases() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        mount_list(
            &server,
            "/api/v1/applications",
            json!([
                {"uuid": "a1", "name": "web", "environment_id": 1},
                {"uuid": "a2", "name": "worker", "environment_id": 1},
                {"uuid": "foreign", "name": "elsewhere", "environment_id": 9}
            ]),
            2,
        )
        .await;
        mount_list(
            &server,
            "/api/v1/databases",
            json!([{"uuid": "d1", "name": "pg", "environment_id": 1}]),
            2,
        )
        .await;
        mount_json(&server, "GET", "/api/v1/services", json!([])).await;

        for route in [
            "/api/v1/applications/a1/stop",
            "/api/v1/applications/a2/stop",
            "/api/v1/databases/d1/stop",
        ] {
            mount_json(&server, "POST", route, json!({"message": "stopping"})).await;
        }
        for route in [
            "/api/v1/applications/a1",
            "/api/v1/applications/a2",
            "/api/v1/databases/d1",
        ] {
            Mock::given(method("DELETE"))
                .and(path(route))
                .respond_with(deleted())
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("DELETE"))
            .and(path("/api/v1/applications/foreign"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/projects/p1"))
            .respond_with(deleted())
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let confirm = Answers::new(false, None);
        let outcome = Destroyer::new(&client, quick(true, 5))
            .run("p1", &confirm, &SilentObserver)
            .await
            .unwrap();

        let DestroyOutcome::Destroyed(report) = outcome else {
            panic!("expected destroyed");
        };
        assert_eq!(report.deleted_applications, 2);
        assert_eq!(report.deleted_databases, 1);
        assert_eq!(report.deleted_services, 0);
        assert!(report.failures.is_empty());
        assert!(report.poll.unwrap().is_completed());
        // forced runs never ask
        assert!(confirm.asked.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_is_collected_not_fatal() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        mount_list(
            &server,
            "/api/v1/applications",
            json!([
                {"uuid": "a1", "name": "web", "environment_id": 1},
                {"uuid": "a2", "name": "worker", "environment_id": 1}
            ]),
            2,
        )
        .await;
        mount_json(&server, "GET", "/api/v1/databases", json!([])).await;
        mount_json(&server, "GET", "/api/v1/services", json!([])).await;
        // stop failures are ignored
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/applications/a1"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"message": "busy"})))
            .mount(&server)
            .await;
        mount_json(&server, "DELETE", "/api/v1/applications/a2", json!({})).await;
        mount_json(&server, "DELETE", "/api/v1/projects/p1", json!({})).await;

        let client = client(&server);
        let outcome = Destroyer::new(&client, quick(true, 3))
            .run("p1", &Answers::new(true, Some("shop")), &SilentObserver)
            .await
            .unwrap();

        let DestroyOutcome::Destroyed(report) = outcome else {
            panic!("expected destroyed");
        };
        assert_eq!(report.deleted_applications, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].uuid, "a1");
        assert!(
            report.failures[0]
                .result
                .as_ref()
                .unwrap_err()
                .contains("busy")
        );
    }

    #[tokio::test]
    async fn test_never_clearing_list_still_deletes_project() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        // the application never disappears from the listing
        mount_json(
            &server,
            "GET",
            "/api/v1/applications",
            json!([{"uuid": "a1", "name": "web", "environment_id": 1}]),
        )
        .await;
        mount_json(&server, "GET", "/api/v1/databases", json!([])).await;
        mount_json(&server, "GET", "/api/v1/services", json!([])).await;
        mount_json(&server, "POST", "/api/v1/applications/a1/stop", json!({})).await;
        mount_json(&server, "DELETE", "/api/v1/applications/a1", json!({})).await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/projects/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let outcome = Destroyer::new(&client, quick(true, 3))
            .run("p1", &Answers::new(false, None), &SilentObserver)
            .await
            .unwrap();

        let DestroyOutcome::Destroyed(report) = outcome else {
            panic!("expected destroyed");
        };
        assert_eq!(report.poll, Some(PollOutcome::Exhausted { attempts: 3 }));
    }

    #[tokio::test]
    async fn test_cancel_at_gate_mutates_nothing() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        mount_json(
            &server,
            "GET",
            "/api/v1/applications",
            json!([{"uuid": "a1", "name": "web", "environment_id": 1}]),
        )
        .await;
        mount_json(&server, "GET", "/api/v1/databases", json!([])).await;
        mount_json(&server, "GET", "/api/v1/services", json!([])).await;
        for verb in ["POST", "DELETE"] {
            Mock::given(method(verb))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;
        }

        let client = client(&server);
        let destroyer = Destroyer::new(&client, quick(false, 1));

        let declined = destroyer
            .run("p1", &Answers::new(false, None), &SilentObserver)
            .await
            .unwrap();
        assert!(matches!(declined, DestroyOutcome::Cancelled));

        let wrong_name = Answers::new(true, Some("not-shop"));
        let mistyped = destroyer.run("p1", &wrong_name, &SilentObserver).await.unwrap();
        assert!(matches!(mistyped, DestroyOutcome::Cancelled));
        assert_eq!(wrong_name.asked.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_project_skips_to_project_deletion() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        for route in ["/api/v1/applications", "/api/v1/databases", "/api/v1/services"] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .expect(1)
                .mount(&server)
                .await;
        }
        mount_json(&server, "DELETE", "/api/v1/projects/p1", json!({})).await;

        let client = client(&server);
        let outcome = Destroyer::new(&client, quick(false, 3))
            .run("p1", &Answers::new(true, Some("shop")), &SilentObserver)
            .await
            .unwrap();

        let DestroyOutcome::Destroyed(report) = outcome else {
            panic!("expected destroyed");
        };
        assert_eq!(report.poll, None);
        assert_eq!(report.deleted_applications, 0);
    }

    #[tokio::test]
    async fn test_project_delete_failure_is_fatal() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        for route in ["/api/v1/applications", "/api/v1/databases", "/api/v1/services"] {
            mount_json(&server, "GET", route, json!([])).await;
        }
        Mock::given(method("DELETE"))
            .and(path("/api/v1/projects/p1"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"message": "Project has resources"})),
            )
            .mount(&server)
            .await;

        let client = client(&server);
        let err = Destroyer::new(&client, quick(true, 1))
            .run("p1", &Answers::new(false, None), &SilentObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::ProjectDeletion { uuid, .. } if uuid == "p1"));
    }

    #[tokio::test]
    async fn test_refetch_drops_resources_that_moved() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        // in the project at plan time, in another project's environment afterwards
        Mock::given(method("GET"))
            .and(path("/api/v1/applications"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"uuid": "a1", "name": "web", "environment_id": 1}
            ])))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        mount_json(
            &server,
            "GET",
            "/api/v1/applications",
            json!([{"uuid": "a1", "name": "web", "environment_id": 9}]),
        )
        .await;
        mount_json(&server, "GET", "/api/v1/databases", json!([])).await;
        mount_json(&server, "GET", "/api/v1/services", json!([])).await;
        for (verb, route) in [
            ("POST", "/api/v1/applications/a1/stop"),
            ("DELETE", "/api/v1/applications/a1"),
        ] {
            Mock::given(method(verb))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;
        }
        mount_json(&server, "DELETE", "/api/v1/projects/p1", json!({})).await;

        let client = client(&server);
        let outcome = Destroyer::new(&client, quick(true, 1))
            .run("p1", &Answers::new(false, None), &SilentObserver)
            .await
            .unwrap();
        let DestroyOutcome::Destroyed(report) = outcome else {
            panic!("expected destroyed");
        };
        assert_eq!(report.deleted_applications, 0);
        assert!(report.failures.is_empty());
    }

    /// Successful stops, as `<kind> <name>`
    #[derive(Default)]
    struct StopLog(std::sync::Mutex<Vec<String>>);

    impl DestroyObserver for StopLog {
        fn on_stop(&self, kind: ResourceKind, name: &str, result: &ActionResult) {
            if result.is_ok() {
                self.0.lock().unwrap().push(format!("{} {}", kind, name));
            }
        }
    }

    #[tokio::test]
    async fn test_forced_destroy_covers_services() {
        let server = MockServer::start().await;
        mount_project(&server).await;
        mount_list(
            &server,
            "/api/v1/applications",
            json!([{"uuid": "a1", "name": "web", "environment_id": 1}]),
            2,
        )
        .await;
        mount_list(
            &server,
            "/api/v1/databases",
            json!([{"uuid": "d1", "name": "pg", "environment_id": 1}]),
            2,
        )
        .await;
        // s3 fails to delete and therefore stays listed
        Mock::given(method("GET"))
            .and(path("/api/v1/services"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"uuid": "s1", "name": "minio", "environment_id": 1},
                {"uuid": "s2", "name": "meilisearch", "environment_id": 1},
                {"uuid": "s3", "name": "plausible", "environment_id": 1},
                {"uuid": "s-foreign", "name": "other", "environment_id": 9}
            ])))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        mount_json(
            &server,
            "GET",
            "/api/v1/services",
            json!([{"uuid": "s3", "name": "plausible", "environment_id": 1}]),
        )
        .await;

        for route in [
            "/api/v1/applications/a1/stop",
            "/api/v1/databases/d1/stop",
            "/api/v1/services/s1/stop",
            "/api/v1/services/s2/stop",
            "/api/v1/services/s3/stop",
        ] {
            Mock::given(method("POST"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .expect(1)
                .mount(&server)
                .await;
        }
        for route in [
            "/api/v1/applications/a1",
            "/api/v1/databases/d1",
            "/api/v1/services/s1",
            "/api/v1/services/s2",
        ] {
            Mock::given(method("DELETE"))
                .and(path(route))
                .respond_with(deleted())
                .expect(1)
                .mount(&server)
                .await;
        }
        Mock::given(method("DELETE"))
            .and(path("/api/v1/services/s3"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "locked"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/services/s-foreign/stop"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/projects/p1"))
            .respond_with(deleted())
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let stops = StopLog::default();
        let outcome = Destroyer::new(&client, quick(true, 3))
            .run("p1", &Answers::new(false, None), &stops)
            .await
            .unwrap();

        let DestroyOutcome::Destroyed(report) = outcome else {
            panic!("expected destroyed");
        };
        let mut stopped = stops.0.into_inner().unwrap();
        stopped.sort();
        assert_eq!(
            stopped,
            vec![
                "application web",
                "database pg",
                "service meilisearch",
                "service minio",
                "service plausible"
            ]
        );
        assert_eq!(report.deleted_applications, 1);
        assert_eq!(report.deleted_databases, 1);
        assert_eq!(report.deleted_services, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, ResourceKind::Service);
        assert_eq!(report.failures[0].uuid, "s3");
        // only successful deletes are waited for
        assert_eq!(report.poll, Some(PollOutcome::Completed { attempts: 1 }));
    }
}
