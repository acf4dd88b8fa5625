//! Build orchestration
//!
//! The [`Arbiter`] walks a [`Pipeline`] level by level. Modules of one level
//! run concurrently up to the configured limit; the next level only starts
//! once every module of the current one is done.
//!
//! A full build goes through these phases:
//!
//! 1. bootstrap every repository root
//! 2. per level: stage dependency copies, build the container image, run the
//!    build (through compose when the package has a compose file)
//! 3. remove the staged dependency copies
//! 4. bootstrap again to restore the linked dependency tree

use std::future::Future;

use futures::{stream, StreamExt, TryStreamExt};

use crate::core::compose::{ComposeVariants, DockerCompose};
use crate::core::config::LinfraConfig;
use crate::core::module::Module;
use crate::core::pipeline::Pipeline;
use crate::error::{ArbiterError, FilesystemError, ResolverError};
use crate::infra::executor::{CommandExecutor, ExitReport};
use crate::infra::filesystem;

/// Result of [`Arbiter::run_full_build`]
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Module names built, per level
    pub levels: Vec<Vec<String>>,
    /// Every command that ran, in completion order
    pub commands: Vec<ExitReport>,
    /// Modules whose build step exited unsuccessfully
    pub failed: Vec<String>,
}

impl BuildReport {
    /// Whether every build step succeeded
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Commands run for one module during the build phase
struct ModuleBuild {
    name: String,
    commands: Vec<ExitReport>,
    build: ExitReport,
}

/// Drives commands over the levels of a pipeline
#[derive(Debug)]
pub struct Arbiter {
    pipeline: Option<Pipeline>,
    config: LinfraConfig,
    executor: CommandExecutor,
}

impl Arbiter {
    /// Create an arbiter without a pipeline
    pub fn new(config: LinfraConfig) -> Self {
        Self {
            pipeline: None,
            config,
            executor: CommandExecutor::new(),
        }
    }

    /// Use `executor` to run commands
    #[must_use]
    pub fn with_executor(mut self, executor: CommandExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Install the pipeline to walk
    pub fn set_pipeline(&mut self, pipeline: Pipeline) {
        self.pipeline = Some(pipeline);
    }

    /// Installed pipeline
    pub fn pipeline(&self) -> Result<&Pipeline, ArbiterError> {
        self.pipeline
            .as_ref()
            .ok_or(ArbiterError::PipelineNotInstalled)
    }

    /// Active configuration
    pub fn config(&self) -> &LinfraConfig {
        &self.config
    }

    /// Bootstrap, build every level, clean up and restore
    pub async fn run_full_build(&self) -> Result<BuildReport, ArbiterError> {
        let pipeline = self.pipeline()?;
        let mut report = BuildReport::default();

        tracing::info!("Bootstrapping {} root(s)", self.config.roots.len());
        report.commands.extend(self.bootstrap().await?);

        let mut cursor = pipeline.cursor();
        cursor.start(0);
        while let Some(level) = cursor.value() {
            tracing::info!("Building level {} ({} module(s))", cursor.index(), level.len());

            let builds: Vec<ModuleBuild> = bounded(
                level.iter(),
                self.config.concurrency.build_level,
                |module| self.build_module(pipeline, module),
            )
            .await?;

            report
                .levels
                .push(level.names().into_iter().map(String::from).collect());

            let mut first_failure = None;
            for build in builds {
                if !build.build.success {
                    tracing::warn!(
                        "{}: build exited with {:?}",
                        build.name,
                        build.build.code
                    );
                    first_failure.get_or_insert((build.name.clone(), build.build.code));
                    report.failed.push(build.name);
                }
                report.commands.extend(build.commands);
            }

            if let Some((module, code)) = first_failure {
                if self.config.build.fail_on_error {
                    return Err(ArbiterError::BuildFailed { module, code });
                }
            }

            cursor.next();
        }

        tracing::info!("Removing staged dependencies");
        cursor.restart(None);
        while let Some(level) = cursor.value() {
            bounded(
                level.iter(),
                self.config.concurrency.restore_level,
                |module| self.remove_dependencies(pipeline, module),
            )
            .await?;
            cursor.next();
        }

        if self.config.build.skip_restore_step {
            tracing::info!("Restore step skipped");
        } else {
            tracing::info!("Restoring dependency links");
            report.commands.extend(self.bootstrap().await?);
        }

        Ok(report)
    }

    /// Run `command` in every module, level by level
    pub async fn execute_command(&self, command: &str) -> Result<Vec<ExitReport>, ArbiterError> {
        let pipeline = self.pipeline()?;
        let mut reports = Vec::with_capacity(pipeline.len());

        for (index, level) in pipeline.levels().iter().enumerate() {
            tracing::debug!("Executing '{command}' on level {index}");
            let level_reports: Vec<ExitReport> = bounded(
                level.iter(),
                self.config.concurrency.build_level,
                |module| self.run_in(module, command),
            )
            .await?;
            reports.extend(level_reports);
        }

        Ok(reports)
    }

    /// Write the compose variants of every module that has a compose file
    ///
    /// Returns the names of the modules whose files were written.
    pub async fn build_docker_compose_files(&self) -> Result<Vec<String>, ArbiterError> {
        let pipeline = self.pipeline()?;
        let mut written = Vec::new();

        for level in pipeline.levels() {
            let results: Vec<Option<String>> = bounded(
                level.iter(),
                self.config.concurrency.build_level,
                |module| async move {
                    let has_compose = self.write_compose_files(pipeline, module).await?;
                    Ok::<_, ArbiterError>(has_compose.then(|| module.name().to_string()))
                },
            )
            .await?;
            written.extend(results.into_iter().flatten());
        }

        Ok(written)
    }

    /// Start one module in watch mode
    ///
    /// Modules with a compose file are brought up detached. Otherwise the
    /// watch command runs in the foreground until it exits.
    pub async fn start_watch(&self, name: &str) -> Result<ExitReport, ArbiterError> {
        let pipeline = self.pipeline()?;
        let module = lookup(pipeline, name)?;
        self.start_module_watch(pipeline, module).await
    }

    /// Stop one module's watch mode
    ///
    /// Returns `None` when there is nothing to stop.
    pub async fn stop_watch(&self, name: &str) -> Result<Option<ExitReport>, ArbiterError> {
        let pipeline = self.pipeline()?;
        let module = lookup(pipeline, name)?;
        self.stop_module_watch(module).await
    }

    /// Start every module in watch mode, level by level
    pub async fn start_watch_all(&self) -> Result<Vec<ExitReport>, ArbiterError> {
        let pipeline = self.pipeline()?;
        let mut reports = Vec::new();

        for level in pipeline.levels() {
            let started: Vec<ExitReport> = bounded(
                level.iter(),
                self.config.concurrency.start_level,
                |module| self.start_module_watch(pipeline, module),
            )
            .await?;
            reports.extend(started);
        }

        Ok(reports)
    }

    /// Stop every module's watch mode, level by level
    pub async fn stop_watch_all(&self) -> Result<Vec<ExitReport>, ArbiterError> {
        let pipeline = self.pipeline()?;
        let mut reports = Vec::new();

        for level in pipeline.levels() {
            let stopped: Vec<Option<ExitReport>> = bounded(
                level.iter(),
                self.config.concurrency.stop_level,
                |module| self.stop_module_watch(module),
            )
            .await?;
            reports.extend(stopped.into_iter().flatten());
        }

        Ok(reports)
    }

    async fn bootstrap(&self) -> Result<Vec<ExitReport>, ArbiterError> {
        let command = self.config.commands.bootstrap.as_str();
        let reports: Vec<ExitReport> = bounded(
            self.config.roots.iter(),
            self.config.concurrency.init_packages,
            |root| async move {
                self.executor
                    .execute(root, command, None)
                    .await
                    .map_err(ArbiterError::from)
            },
        )
        .await?;

        for report in reports.iter().filter(|r| !r.success) {
            tracing::warn!(
                "Bootstrap in {} exited with {:?}",
                report.working_dir.display(),
                report.code
            );
        }
        Ok(reports)
    }

    async fn build_module(
        &self,
        pipeline: &Pipeline,
        module: &Module,
    ) -> Result<ModuleBuild, ArbiterError> {
        tracing::debug!("Building '{}'", module.name());
        self.stage_dependencies(pipeline, module).await?;

        let mut commands = Vec::new();

        let dockerfile = module.path().join(&self.config.docker.dockerfile);
        if filesystem::has_file(&dockerfile).await {
            let tag = self.config.docker.image_tag(module.folder_name());
            let report = self
                .run_in(
                    module,
                    &format!(
                        "docker build -t {tag} -f {} .",
                        self.config.docker.dockerfile
                    ),
                )
                .await?;
            if !report.success {
                tracing::warn!("{}: image build exited with {:?}", module.name(), report.code);
            }
            commands.push(report);
        }

        let build = if self.write_compose_files(pipeline, module).await? {
            let file = &self.config.docker.compose_build_file;
            commands.push(self.run_in(module, &self.compose(file, "down")).await?);
            let up = self.run_in(module, &self.compose(file, "up")).await?;
            commands.push(up.clone());
            commands.push(self.run_in(module, &self.compose(file, "down")).await?);
            up
        } else {
            let report = self.run_in(module, &self.config.commands.build).await?;
            commands.push(report.clone());
            report
        };

        Ok(ModuleBuild {
            name: module.name().to_string(),
            commands,
            build,
        })
    }

    /// Copy each dependency into `<module>/<deps folder>/<dependency name>`
    async fn stage_dependencies(
        &self,
        pipeline: &Pipeline,
        module: &Module,
    ) -> Result<(), ArbiterError> {
        let deps_folder = self.config.commands.deps_folder.clone();
        let staging = module.path().join(&deps_folder);

        bounded(
            pipeline.dependencies(module)?,
            self.config.concurrency.copy_dependencies,
            |dep| {
                let from = dep.path().to_path_buf();
                let to = staging.join(dep.name());
                let skip = deps_folder.clone();
                tracing::debug!("{}: staging '{}'", module.name(), dep.name());
                blocking(move || {
                    filesystem::remove_path(&to)?;
                    filesystem::copy_dir_all(&from, &to, &[skip.as_str()])
                })
            },
        )
        .await?;

        Ok(())
    }

    async fn remove_dependencies(
        &self,
        pipeline: &Pipeline,
        module: &Module,
    ) -> Result<(), ArbiterError> {
        let staging = module.path().join(&self.config.commands.deps_folder);

        bounded(
            pipeline.dependencies(module)?,
            self.config.concurrency.remove_dependencies,
            |dep| {
                let target = staging.join(dep.name());
                let staging = staging.clone();
                blocking(move || {
                    filesystem::remove_path(&target)?;
                    // Scoped names leave a `@scope` folder behind
                    filesystem::prune_empty_parents(&target, &staging);
                    Ok(())
                })
            },
        )
        .await?;

        Ok(())
    }

    /// Write the `deps`, `build` and `watch` compose files of `module`
    ///
    /// Returns false if the module has no compose file.
    async fn write_compose_files(
        &self,
        pipeline: &Pipeline,
        module: &Module,
    ) -> Result<bool, ArbiterError> {
        let docker = &self.config.docker;
        let base_path = module.path().join(&docker.compose_file);
        if !filesystem::has_file(&base_path).await {
            return Ok(false);
        }

        let base = DockerCompose::load(&base_path).await?;
        let dependencies = pipeline.dependencies(module)?;
        let variants = ComposeVariants::derive(
            &base,
            &dependencies,
            &self.config.commands.build,
            &self.config.commands.watch,
        );

        variants
            .deps
            .save(&module.path().join(&docker.compose_deps_file))
            .await?;
        variants
            .build
            .save(&module.path().join(&docker.compose_build_file))
            .await?;
        variants
            .watch
            .save(&module.path().join(&docker.compose_watch_file))
            .await?;

        tracing::debug!("{}: compose files written", module.name());
        Ok(true)
    }

    async fn start_module_watch(
        &self,
        pipeline: &Pipeline,
        module: &Module,
    ) -> Result<ExitReport, ArbiterError> {
        if self.write_compose_files(pipeline, module).await? {
            let command = self.compose(&self.config.docker.compose_watch_file, "up -d");
            return self.run_in(module, &command).await;
        }
        self.run_in(module, &self.config.commands.watch).await
    }

    async fn stop_module_watch(&self, module: &Module) -> Result<Option<ExitReport>, ArbiterError> {
        let compose_file = module.path().join(&self.config.docker.compose_file);
        if !filesystem::has_file(&compose_file).await {
            tracing::info!("{}: no compose file, nothing to stop", module.name());
            return Ok(None);
        }

        let command = self.compose(&self.config.docker.compose_watch_file, "down");
        Ok(Some(self.run_in(module, &command).await?))
    }

    async fn run_in(&self, module: &Module, command: &str) -> Result<ExitReport, ArbiterError> {
        Ok(self
            .executor
            .execute(module.path(), command, Some(module.name()))
            .await?)
    }

    fn compose(&self, file: &str, action: &str) -> String {
        format!("{} -f {file} {action}", self.config.docker.compose_command)
    }
}

fn lookup<'p>(pipeline: &'p Pipeline, name: &str) -> Result<&'p Module, ArbiterError> {
    pipeline.module(name).ok_or_else(|| {
        ResolverError::UnknownModule {
            name: name.to_string(),
        }
        .into()
    })
}

/// Run `task` over `items`, at most `limit` at a time
///
/// The first error drops every task still in flight. A limit of 0 is
/// treated as 1.
async fn bounded<I, F, Fut, T>(items: I, limit: usize, task: F) -> Result<Vec<T>, ArbiterError>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T, ArbiterError>>,
{
    stream::iter(items)
        .map(task)
        .buffer_unordered(limit.max(1))
        .try_collect()
        .await
}

async fn blocking<F>(work: F) -> Result<(), ArbiterError>
where
    F: FnOnce() -> Result<(), FilesystemError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ArbiterError::Task {
            error: e.to_string(),
        })??;
    Ok(())
}
