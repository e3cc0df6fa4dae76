use crate::util::{cargo, has_cargo_subcmd, rustup, CommandExt};
use crate::Result;
use argp::FromArgs;

const COMPONENTS: &[&str] = &["rustfmt", "clippy"];
const TOOLS: &[&str] = &["cargo-insta"];

#[derive(FromArgs)]
#[argp(subcommand, name = "setup")]
/// Install snapshot tooling and rustup components
pub struct Setup {
  #[argp(switch, description = "Install using `cargo-binstall` instead")]
  binary: bool,

  #[argp(switch, description = "Don't add rustup components")]
  no_components: bool,
}

impl Setup {
  pub fn run(self) -> Result {
    let install = if self.binary {
      if !has_cargo_subcmd("binstall")? {
        cargo("install").with_arg("cargo-binstall").run()?;
      }
      cargo("binstall").with_arg("--no-confirm")
    } else {
      cargo("install")
    };
    install.with_arg("--locked").with_args(TOOLS).run()?;

    if !self.no_components {
      rustup("component")
        .with_arg("add")
        .with_args(COMPONENTS)
        .run()?;
    }

    Ok(())
  }
}
