//! CLI route: single route table and run context. Every path through
//! [`RunContext::execute`] ends in exactly one envelope.

use crate::classify::{classify, ClassifyContext, ServiceFamily};
use crate::client::ApiClient;
use crate::commands::{ReviewsGet, ReviewsList, VitalsQuery};
use crate::config::{AppConfig, ConfigLoader};
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::pagination::{Deadline, PaginationOptions};
use crate::render::OutputFormat;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::cli::help::{command_family, command_name, supports_csv};
use crate::cli::output::OutputOptions;
use crate::cli::parse::{Cli, Commands, ReviewsCommands, VitalsCommands};

/// Runtime context for CLI execution: the loaded configuration, or the error
/// that prevented loading it.
pub struct RunContext {
    config: AppConfig,
    startup_error: Option<ApiError>,
}

/// Outcome of one invocation, ready for [`crate::cli::emit`].
#[derive(Debug)]
pub struct Invocation {
    pub envelope: Envelope,
    pub options: OutputOptions,
}

/// Request settings after flags have been folded over the configuration.
struct RequestPlan {
    config: AppConfig,
    timeout: Duration,
    pagination: PaginationOptions,
}

impl RunContext {
    /// Load configuration. A load failure is kept and reported as the
    /// command's envelope; defaults stand in so logging still initializes.
    pub fn new(config_path: Option<&Path>) -> Self {
        match ConfigLoader::load(config_path) {
            Ok(config) => Self::from_config(config),
            Err(e) => Self {
                config: AppConfig::default(),
                startup_error: Some(e),
            },
        }
    }

    pub fn from_config(config: AppConfig) -> Self {
        Self {
            config,
            startup_error: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub async fn execute(&self, cli: &Cli) -> Invocation {
        let started = Instant::now();
        let name = command_name(&cli.command);
        info!(command = %name, "Command started");

        let pretty = cli.pretty || self.config.output.pretty;
        let (envelope, options) = match OutputOptions::resolve(
            cli.output.as_deref(),
            &self.config.output.format,
            pretty,
            cli.fields.clone(),
        ) {
            Ok(options) => (self.execute_inner(cli, &name, &options).await, options),
            Err(e) => (
                reject(command_family(&cli.command), e),
                OutputOptions::json(pretty),
            ),
        };

        match envelope.error() {
            Some(error) => warn!(command = %name, code = %error.code(), "Command failed"),
            None => info!(command = %name, "Command completed"),
        }
        Invocation {
            envelope: envelope.with_duration(started.elapsed()),
            options,
        }
    }

    async fn execute_inner(&self, cli: &Cli, name: &str, options: &OutputOptions) -> Envelope {
        let family = command_family(&cli.command);

        if options.format == OutputFormat::Csv && !supports_csv(&cli.command) {
            let err = ApiError::UnsupportedFormat {
                format: options.format.to_string(),
                command: name.replace('.', " "),
            };
            return Envelope::from_error(classify(&err, &ClassifyContext::new(family)));
        }

        if let Some(e) = &self.startup_error {
            return Envelope::from_error(classify(e, &ClassifyContext::new(ServiceFamily::Local)));
        }

        let plan = match self.plan_request(cli) {
            Ok(plan) => plan,
            Err(e) => return reject(family, e),
        };
        let route = Route::from_command(&cli.command);
        if let Err(e) = route.validate() {
            return reject(family, e);
        }

        let client = match ApiClient::from_config(&plan.config) {
            Ok(client) => client,
            Err(e) => return Envelope::from_error(classify(&e, &ClassifyContext::new(family))),
        };

        debug!(
            timeout_secs = plan.timeout.as_secs(),
            all = plan.pagination.all,
            "Dispatching"
        );
        let deadline = Deadline::after(plan.timeout);
        match route.run(&client, &plan.pagination, &deadline).await {
            Ok(envelope) => envelope,
            Err(e) => Envelope::from_error(classify(&e, &ClassifyContext::new(family)))
                .with_services(family.service_name()),
        }
    }

    /// Fold `--timeout`, `--page-size`, `--page-token`, `--all` and
    /// `--max-pages` over the configured request defaults.
    fn plan_request(&self, cli: &Cli) -> Result<RequestPlan, ApiError> {
        let mut config = self.config.clone();
        if let Some(timeout) = cli.timeout {
            if timeout == 0 {
                return Err(ApiError::Validation(
                    "--timeout must be greater than zero".to_string(),
                ));
            }
            config.request.timeout_secs = timeout;
        }

        let page_size = cli.page_size.or(config.request.page_size);
        if page_size == Some(0) {
            return Err(ApiError::Validation(
                "--page-size must be greater than zero".to_string(),
            ));
        }
        let max_pages = cli.max_pages.or(config.request.max_pages);
        if max_pages == Some(0) {
            return Err(ApiError::Validation(
                "--max-pages must be greater than zero".to_string(),
            ));
        }

        Ok(RequestPlan {
            timeout: config.request.timeout(),
            pagination: PaginationOptions {
                page_token: cli.page_token.clone().unwrap_or_default(),
                page_size,
                all: cli.all,
                max_pages,
            },
            config,
        })
    }
}

/// Envelope for input rejected before any network call.
fn reject(family: ServiceFamily, err: ApiError) -> Envelope {
    let message = match &err {
        ApiError::Validation(message) => message.clone(),
        other => other.to_string(),
    };
    let ctx = ClassifyContext::new(family).with_local_validation(message);
    Envelope::from_error(classify(&err, &ctx))
}

/// One parsed command bound to its implementation.
enum Route {
    ReviewsList(ReviewsList),
    ReviewsGet(ReviewsGet),
    VitalsQuery(VitalsQuery),
}

impl Route {
    fn from_command(command: &Commands) -> Self {
        match command {
            Commands::Reviews { command } => match command {
                ReviewsCommands::List {
                    package,
                    translation_language,
                } => Route::ReviewsList(ReviewsList {
                    package: package.clone(),
                    translation_language: translation_language.clone(),
                }),
                ReviewsCommands::Get {
                    package,
                    review_id,
                    translation_language,
                } => Route::ReviewsGet(ReviewsGet {
                    package: package.clone(),
                    review_id: review_id.clone(),
                    translation_language: translation_language.clone(),
                }),
            },
            Commands::Vitals { command } => match command {
                VitalsCommands::Query {
                    package,
                    metric_set,
                    metrics,
                    dimensions,
                    days,
                } => Route::VitalsQuery(VitalsQuery {
                    package: package.clone(),
                    metric_set: metric_set.clone(),
                    metrics: metrics.clone(),
                    dimensions: dimensions.clone(),
                    days: *days,
                }),
            },
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        match self {
            Route::ReviewsList(cmd) => cmd.validate(),
            Route::ReviewsGet(cmd) => cmd.validate(),
            Route::VitalsQuery(cmd) => cmd.validate().map(|_| ()),
        }
    }

    async fn run(
        &self,
        client: &ApiClient,
        pagination: &PaginationOptions,
        deadline: &Deadline,
    ) -> Result<Envelope, ApiError> {
        match self {
            Route::ReviewsList(cmd) => cmd.run(client, pagination, deadline).await,
            Route::ReviewsGet(cmd) => cmd.run(client, deadline).await,
            Route::VitalsQuery(cmd) => cmd.run(client, pagination, deadline).await,
        }
    }
}
