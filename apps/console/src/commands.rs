use std::io::BufRead;

use paas_application::{AuditLogFilter, InstanceServiceLogFilter, ServiceLogFilter};
use paas_core::{AppError, AppResult};
use paas_domain::{AuditLog, NavigationDecision, Page, RedisInstance, RouteName, ServiceLog};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cli::ConsoleCommand;
use crate::console_services::ConsoleServices;

pub async fn run(
    services: &ConsoleServices,
    command: ConsoleCommand,
    cancel: &CancellationToken,
) -> AppResult<String> {
    match command {
        ConsoleCommand::Login { email, password } => {
            enter(services, RouteName::Login)?;
            let password = match password {
                Some(password) => password,
                None => read_password(std::io::stdin().lock())?,
            };
            let snapshot = cancel
                .run_until_cancelled(services.auth.login(email.as_str(), password.as_str()))
                .await
                .unwrap_or(Err(AppError::Cancelled))?;
            Ok(describe_identity(snapshot.user.as_ref().map(|user| (user.email(), user.is_admin()))))
        }
        ConsoleCommand::Logout => {
            services.auth.logout()?;
            Ok("signed out".to_owned())
        }
        ConsoleCommand::Whoami => {
            let snapshot = services.session.snapshot();
            if !snapshot.is_authenticated() {
                return Ok("not signed in".to_owned());
            }
            Ok(describe_identity(snapshot.user.as_ref().map(|user| (user.email(), user.is_admin()))))
        }
        ConsoleCommand::Navigate { path } => {
            let decision = services.guard.decide_path(path.as_str(), services.session.as_ref());
            Ok(match decision {
                NavigationDecision::Proceed => format!("open {path}"),
                NavigationDecision::Redirect(target) => {
                    format!("redirect to {}", route_path(services, target))
                }
            })
        }
        ConsoleCommand::Instances => {
            enter(services, RouteName::Instances)?;
            let page = services.instances.list_cancellable(cancel).await;
            Ok(render_page(&report(services, page)?, render_instance))
        }
        ConsoleCommand::AuditLogs {
            page,
            action_type,
            admin_only,
        } => {
            enter(services, RouteName::AuditLogs)?;
            let filter = AuditLogFilter {
                page,
                action_type,
                admin_only: Some(admin_only),
            };
            let page = services.audit_logs.list_cancellable(&filter, cancel).await;
            Ok(render_page(&report(services, page)?, render_audit_log))
        }
        ConsoleCommand::ServiceLogs {
            page,
            instance,
            namespace,
        } => {
            enter(services, RouteName::ServiceLogs)?;
            let filter = ServiceLogFilter {
                page,
                instance,
                namespace,
            };
            let page = services.service_logs.list_cancellable(&filter, cancel).await;
            Ok(render_page(&report(services, page)?, render_service_log))
        }
        ConsoleCommand::InstanceLogs {
            id,
            page,
            namespace,
        } => {
            enter(services, RouteName::InstanceDetail)?;
            let filter = InstanceServiceLogFilter { page, namespace };
            let page = services
                .service_logs
                .list_for_instance_cancellable(id.as_str(), &filter, cancel)
                .await;
            Ok(render_page(&report(services, page)?, render_service_log))
        }
    }
}

fn enter(services: &ConsoleServices, route: RouteName) -> AppResult<()> {
    match services.guard.decide(route, services.session.as_ref()) {
        NavigationDecision::Proceed => Ok(()),
        NavigationDecision::Redirect(RouteName::Login) => Err(AppError::Unauthorized(
            "not signed in, run `paas-console login` first".to_owned(),
        )),
        NavigationDecision::Redirect(target) => Err(AppError::Validation(format!(
            "already signed in, continue at {}",
            route_path(services, target)
        ))),
    }
}

fn report<T>(services: &ConsoleServices, result: AppResult<Page<T>>) -> AppResult<Page<T>> {
    if let Err(error) = &result
        && error.is_unauthorized()
    {
        info!(
            redirect = route_path(services, RouteName::Login),
            "session rejected by the api"
        );
    }

    result
}

fn read_password<R: BufRead>(mut input: R) -> AppResult<String> {
    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|error| AppError::Validation(format!("failed to read password: {error}")))?;

    Ok(line.trim_end_matches(['\r', '\n']).to_owned())
}

fn route_path(services: &ConsoleServices, route: RouteName) -> &'static str {
    services
        .guard
        .table()
        .definition(route)
        .map_or("/", |definition| definition.path)
}

fn describe_identity(identity: Option<(&str, bool)>) -> String {
    match identity {
        Some((email, true)) => format!("signed in as {email} (admin)"),
        Some((email, false)) => format!("signed in as {email}"),
        None => "signed in".to_owned(),
    }
}

fn render_page<T>(page: &Page<T>, render: fn(&T) -> String) -> String {
    page.items()
        .iter()
        .map(render)
        .chain(std::iter::once(format!(
            "page {} of {} ({} total)",
            page.page(),
            page.total_pages(),
            page.total()
        )))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_instance(instance: &RedisInstance) -> String {
    let endpoint = match (&instance.external_host, instance.external_port) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (None, Some(port)) => format!(":{port}"),
        _ => "-".to_owned(),
    };
    format!(
        "{}\t{}/{}\t{}\t{}",
        instance.id, instance.namespace, instance.name, instance.status, endpoint
    )
}

fn render_audit_log(entry: &AuditLog) -> String {
    format!(
        "{}\t{}{}\t{}\t{}/{}",
        entry.timestamp.to_rfc3339(),
        entry.user_email,
        if entry.admin_info { " (admin)" } else { "" },
        entry.action.action,
        entry.action.namespace,
        entry.action.name
    )
}

fn render_service_log(entry: &ServiceLog) -> String {
    let transition = match entry.from_status.as_deref() {
        Some(from) => format!("{from} -> {}", entry.to_status),
        None => entry.to_status.clone(),
    };
    format!(
        "{}\t{}/{}\t{}\t{}\t{}",
        entry.timestamp.to_rfc3339(),
        entry.namespace,
        entry.instance_name,
        entry.event_type.as_str(),
        transition,
        entry.message
    )
}
