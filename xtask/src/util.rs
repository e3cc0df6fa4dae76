use crate::Result;
use anyhow::{bail, Context};
use std::ffi::OsStr;
use std::process::{Command, Stdio};

pub fn cargo(subcommand: &str) -> Command {
  let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".into());
  Command::new(cargo).with_arg(subcommand)
}

pub fn rustup(subcommand: &str) -> Command {
  Command::new("rustup").with_arg(subcommand)
}

pub fn has_cargo_subcmd(name: &str) -> Result<bool> {
  let output = cargo("--list").run_with_output()?;
  Ok(
    output
      .lines()
      .filter_map(|line| line.split_whitespace().next())
      .any(|subcmd| subcmd == name),
  )
}

pub trait CommandExt: Sized {
  fn with_arg(self, arg: impl AsRef<OsStr>) -> Self;
  fn with_args<I, S>(self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>;
  fn run(self) -> Result;
  fn run_with_output(self) -> Result<String>;
}

impl CommandExt for Command {
  fn with_arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.arg(arg);
    self
  }

  fn with_args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args(args);
    self
  }

  fn run(mut self) -> Result {
    let status = self
      .status()
      .with_context(|| format!("failed to run {self:?}"))?;
    if !status.success() {
      bail!("{self:?} exited with {status}");
    }
    Ok(())
  }

  fn run_with_output(mut self) -> Result<String> {
    let output = self
      .stderr(Stdio::inherit())
      .output()
      .with_context(|| format!("failed to run {self:?}"))?;
    if !output.status.success() {
      bail!("{self:?} exited with {}", output.status);
    }
    String::from_utf8(output.stdout).context("command output was not valid utf-8")
  }
}
