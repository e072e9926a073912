//! Microservice read-policy CLI commands

use anyhow::Result;
use clap::Args;

use super::output::{self, OutputFormat};
use crate::config::HelperConfiguration;
use crate::policy::{FilePolicyRepository, Policy};
use crate::services::PolicyService;

#[derive(Args, Debug)]
pub struct ReadPoliciesArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct PolicyPathArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Secret path, e.g. env/myTeam/myService/jdbc.password
    #[arg(long, value_name = "PATH")]
    pub path: String,
}

#[derive(Args, Debug)]
pub struct ScopeArgs {
    /// Scheduler framework, e.g. marathon or chronos (defaults to default_framework)
    #[arg(long, value_name = "FRAMEWORK")]
    pub framework: Option<String>,

    /// Organizational group
    #[arg(long, value_name = "GROUP")]
    pub group: String,

    /// Microservice as team-service, e.g. myTeam-myService
    #[arg(long, value_name = "TEAM-SERVICE")]
    pub microservice: String,

    /// Output format (table, json, yaml, or hcl)
    #[arg(short, long, default_value = "table", value_parser = ["table", "json", "yaml", "hcl"])]
    pub output: String,
}

pub fn handle_read_policies(args: ReadPoliciesArgs, config: &HelperConfiguration) -> Result<()> {
    let repository = FilePolicyRepository::new(config.policy_repository_path()?);
    let scope = &args.scope;

    let policy = PolicyService::new(config, &repository).read_policies(
        scope.framework.as_deref(),
        &scope.group,
        &scope.microservice,
    )?;

    print_policy(&policy, &scope.output)
}

pub fn handle_add_policies(args: PolicyPathArgs, config: &HelperConfiguration) -> Result<()> {
    let repository = FilePolicyRepository::new(config.policy_repository_path()?);
    let scope = &args.scope;

    let policy = PolicyService::new(config, &repository).add_policies(
        scope.framework.as_deref(),
        &scope.group,
        &scope.microservice,
        &args.path,
    )?;

    print_policy(&policy, &scope.output)
}

pub fn handle_remove_policies(args: PolicyPathArgs, config: &HelperConfiguration) -> Result<()> {
    let repository = FilePolicyRepository::new(config.policy_repository_path()?);
    let scope = &args.scope;

    let policy = PolicyService::new(config, &repository).remove_policies(
        scope.framework.as_deref(),
        &scope.group,
        &scope.microservice,
        &args.path,
    )?;

    print_policy(&policy, &scope.output)
}

fn print_policy(policy: &Policy, format: &str) -> Result<()> {
    match OutputFormat::parse(format)? {
        OutputFormat::Json => output::print_json(&policy.entries()),
        OutputFormat::Yaml => output::print_yaml(&policy.entries()),
        OutputFormat::Hcl => {
            print!("{}", policy.to_hcl());
            Ok(())
        }
        OutputFormat::Table => {
            print_policy_table(policy);
            Ok(())
        }
    }
}

fn print_policy_table(policy: &Policy) {
    println!("{}", policy.scope());
    if policy.entries().is_empty() {
        println!("No read policies");
        return;
    }

    for entry in policy.entries() {
        output::print_item(&entry.path);
    }
}
