//! Target synthesis: the feature-conditioned command policy table.
//!
//! Every operation name in [`TARGET_NAMES`] is always defined; branches for
//! absent features degrade to explicit echo no-ops so callers can invoke any
//! target safely. Command strings are a pure function of the inputs, so the
//! same feature set always yields the same target map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generator::features::{Feature, FeatureSet};

/// Fixed operation names, in descriptor order.
pub const TARGET_NAMES: [&str; 16] = [
    "build",
    "lint",
    "test",
    "firebase",
    "killports",
    "emulators:start",
    "emulators:debug",
    "emulators:stop",
    "getconfig",
    "deploy",
    "deploy-functions",
    "dev",
    "data:export",
    "data:import",
    "data:seed",
    "logs",
];

/// Options block of one target, serialized in the executor's schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetOptions {
    /// Single invocation command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Ordered command list (used with `parallel`).
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub commands: Vec<String>,
    /// Working directory, workspace-relative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// Forward extra CLI arguments to the command.
    #[serde(rename = "forwardAllArgs", skip_serializing_if = "Option::is_none")]
    pub forward_all_args: Option<bool>,
    /// Run the command list in parallel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    /// Build output path (bundler executors).
    #[serde(rename = "outputPath", skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    /// Build entry point (bundler executors).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    /// Compiler configuration file (bundler executors).
    #[serde(rename = "tsConfig", skip_serializing_if = "Option::is_none")]
    pub ts_config: Option<String>,
}

impl TargetOptions {
    fn is_empty(&self) -> bool {
        self == &TargetOptions::default()
    }
}

/// One named, invokable operation in a project descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDefinition {
    /// Executor identifier understood by the target runner.
    pub executor: String,
    /// Executor options.
    #[serde(skip_serializing_if = "TargetOptions::is_empty", default)]
    pub options: TargetOptions,
    /// Upstream targets that must run first.
    #[serde(rename = "dependsOn", skip_serializing_if = "Vec::is_empty", default)]
    pub depends_on: Vec<String>,
}

impl TargetDefinition {
    /// A `nx:run-commands` target with a single command.
    #[must_use]
    pub fn run_command(command: impl Into<String>) -> Self {
        Self {
            executor: "nx:run-commands".into(),
            options: TargetOptions { command: Some(command.into()), ..TargetOptions::default() },
            depends_on: Vec::new(),
        }
    }

    /// A `nx:run-commands` target running several commands in parallel.
    #[must_use]
    pub fn run_parallel(commands: Vec<String>) -> Self {
        Self {
            executor: "nx:run-commands".into(),
            options: TargetOptions { commands, parallel: Some(true), ..TargetOptions::default() },
            depends_on: Vec::new(),
        }
    }

    /// A target that is entirely delegated to a dedicated executor.
    #[must_use]
    pub fn executor_only(executor: impl Into<String>) -> Self {
        Self { executor: executor.into(), options: TargetOptions::default(), depends_on: Vec::new() }
    }

    /// Sets the working directory.
    #[must_use]
    pub fn with_cwd(mut self, cwd: impl Into<String>) -> Self {
        self.options.cwd = Some(cwd.into());
        self
    }

    /// Adds upstream target dependencies.
    #[must_use]
    pub fn with_depends_on(mut self, targets: &[&str]) -> Self {
        self.depends_on = targets.iter().map(|t| (*t).to_string()).collect();
        self
    }

    /// Forwards extra CLI arguments through to the command.
    #[must_use]
    pub fn forwarding_args(mut self) -> Self {
        self.options.forward_all_args = Some(true);
        self
    }
}

/// Probe of the source project's own build prerequisites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FunctionsSetup {
    /// `functions/package.json` exists in the init directory.
    pub has_manifest: bool,
    /// `functions/tsconfig.json` exists in the init directory.
    pub has_compiler_config: bool,
}

impl FunctionsSetup {
    /// Both prerequisites for a native functions build are present.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self.has_manifest && self.has_compiler_config
    }
}

/// Everything target synthesis depends on.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInputs<'a> {
    /// Detected feature set.
    pub features: &'a FeatureSet,
    /// Base project name (`scope:` tag value).
    pub base_name: &'a str,
    /// Workspace-relative project root.
    pub project_root: &'a str,
    /// Name of the dependent functions sub-project, when one was created.
    pub functions_app: Option<&'a str>,
    /// Source-project build prerequisite probe.
    pub functions_setup: FunctionsSetup,
}

/// How the build target resolves, in strict priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResolution {
    /// A dependent sub-project was created; delegate entirely to it.
    Delegated(String),
    /// The source project's own build prerequisites are present.
    Native,
    /// Functions configured but the source setup is incomplete.
    Incomplete,
    /// No functions feature; nothing to build.
    NoBuild,
}

/// Resolves the build tier for the given inputs.
#[must_use]
pub fn resolve_build(inputs: &SynthesisInputs) -> BuildResolution {
    if let Some(app) = inputs.functions_app {
        BuildResolution::Delegated(app.to_string())
    } else if inputs.features.has(Feature::Functions) && inputs.functions_setup.is_complete() {
        BuildResolution::Native
    } else if inputs.features.has(Feature::Functions) {
        BuildResolution::Incomplete
    } else {
        BuildResolution::NoBuild
    }
}

/// Synthesizes the full target map for one project descriptor.
#[must_use]
pub fn synthesize(inputs: &SynthesisInputs) -> BTreeMap<String, TargetDefinition> {
    TARGET_NAMES.iter().map(|name| ((*name).to_string(), build_target(name, inputs))).collect()
}

fn build_target(name: &str, inputs: &SynthesisInputs) -> TargetDefinition {
    let features = inputs.features;
    let root = inputs.project_root;
    match name {
        "build" => match resolve_build(inputs) {
            BuildResolution::Delegated(app) => TargetDefinition::run_command(format!("nx build {app}")),
            BuildResolution::Native => {
                TargetDefinition::run_command("npm run build --prefix functions").with_cwd(root)
            }
            BuildResolution::Incomplete => TargetDefinition::run_command(
                "echo \"Functions detected but setup incomplete. Run 'firebase init functions' to complete setup.\"",
            )
            .with_cwd(root),
            BuildResolution::NoBuild => {
                TargetDefinition::run_command("echo \"No build needed.\"").with_cwd(root)
            }
        },
        "lint" => TargetDefinition::executor_only("@nx/eslint:lint"),
        "test" => TargetDefinition::run_command(format!(
            "nx run-many --target=test --projects=tag:scope:{}",
            inputs.base_name
        )),
        "firebase" => TargetDefinition::run_command("firebase").with_cwd(root).forwarding_args(),
        "killports" | "emulators:stop" => kill_ports_target(features),
        "emulators:start" => emulator_suite_target(features, root, false),
        "emulators:debug" => emulator_suite_target(features, root, true),
        "getconfig" => TargetDefinition::run_command(
            "firebase --config=firebase.json functions:config:get > .runtimeconfig.json",
        )
        .with_cwd(root),
        "deploy" => TargetDefinition::run_command("firebase deploy")
            .with_cwd(root)
            .with_depends_on(&["build"]),
        "deploy-functions" => {
            let command = if features.has(Feature::Functions) {
                "firebase deploy --only functions"
            } else {
                "echo \"No functions to deploy\""
            };
            TargetDefinition::run_command(command).with_cwd(root).with_depends_on(&["build"])
        }
        "dev" => dev_target(inputs),
        "data:export" => {
            TargetDefinition::run_command("firebase emulators:export ./emulator-data --force")
                .with_cwd(root)
        }
        "data:import" => TargetDefinition::run_command(
            "firebase emulators:start --import=./emulator-data --export-on-exit=./emulator-data",
        )
        .with_cwd(root),
        "data:seed" => {
            TargetDefinition::run_command("echo \"Add your data seeding script here\"")
                .with_cwd(root)
        }
        "logs" => {
            let command = if features.has(Feature::Functions) {
                "firebase functions:log"
            } else {
                "echo \"No functions configured\""
            };
            TargetDefinition::run_command(command).with_cwd(root)
        }
        _ => unreachable!("unknown target name {name}"),
    }
}

fn emulator_start_command(services: &[&str], debug: bool) -> String {
    let inspect = if debug { "--inspect-functions " } else { "" };
    format!(
        "firebase emulators:start {inspect}--only={} --import=./emulator-data --export-on-exit=./emulator-data",
        services.join(",")
    )
}

fn emulator_suite_target(features: &FeatureSet, root: &str, debug: bool) -> TargetDefinition {
    let services = features.emulator_services();
    let command = if features.has(Feature::Emulators) && !services.is_empty() {
        emulator_start_command(&services, debug)
    } else {
        "echo \"No emulators configured\"".to_string()
    };
    TargetDefinition::run_command(command).with_cwd(root)
}

fn kill_ports_target(features: &FeatureSet) -> TargetDefinition {
    let ports = features.emulator_ports();
    if ports.is_empty() {
        TargetDefinition::run_command("echo \"No ports to kill\"")
    } else {
        TargetDefinition::run_command(format!("npx -y kill-port --port {}", ports.join(",")))
    }
}

fn dev_target(inputs: &SynthesisInputs) -> TargetDefinition {
    let features = inputs.features;
    let services = features.emulator_services();
    let has_emulators = features.has(Feature::Emulators) && !services.is_empty();
    if let (Some(app), true) = (inputs.functions_app, has_emulators) {
        return TargetDefinition::run_parallel(vec![
            format!("nx build {app} --watch"),
            format!("cd {} && {}", inputs.project_root, emulator_start_command(&services, false)),
        ]);
    }
    let command = if has_emulators {
        emulator_start_command(&services, false)
    } else {
        "echo \"No development environment configured\"".to_string()
    };
    TargetDefinition::run_command(command).with_cwd(inputs.project_root)
}
