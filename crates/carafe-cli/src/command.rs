//! Command parsing and execution

use std::io::Write;
use std::path::{Path, PathBuf};

use carafe_core::{
    Component, ComponentState, Design, DesignError, ParameterError, ParameterKind,
};

pub const USAGE: &str = "\
usage:
  carafe show [FILE]
  carafe new FILE [NAME]
  carafe set FILE KIND=VALUE...
  carafe check KIND VALUE [FILE]
  carafe component FILE handle|lid present|missing";

/// Command-line errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error(transparent)]
    Design(#[from] DesignError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Print every parameter of a design (or of a fresh one)
    Show { file: Option<PathBuf> },
    /// Write a fresh design
    New { file: PathBuf, name: Option<String> },
    /// Apply assignments in order and save
    Set {
        file: PathBuf,
        assignments: Vec<(ParameterKind, f64)>,
    },
    /// Report whether a value is currently valid
    Check {
        kind: ParameterKind,
        value: f64,
        file: Option<PathBuf>,
    },
    /// Mark a component present or missing
    Component {
        file: PathBuf,
        component: Component,
        state: ComponentState,
    },
}

fn parse_number(text: &str) -> Result<f64, CliError> {
    text.trim()
        .parse()
        .map_err(|_| CliError::InvalidNumber(text.to_string()))
}

fn parse_assignment(text: &str) -> Result<(ParameterKind, f64), CliError> {
    let (kind, value) = text
        .split_once('=')
        .ok_or_else(|| CliError::Usage(format!("Expected KIND=VALUE, got '{}'", text)))?;
    Ok((kind.parse()?, parse_number(value)?))
}

fn usage(message: &str) -> CliError {
    CliError::Usage(message.to_string())
}

impl Command {
    /// Parse arguments (without the program name)
    pub fn parse(args: &[String]) -> Result<Self, CliError> {
        let (name, rest) = args.split_first().ok_or_else(|| usage("Missing command"))?;

        match (name.as_str(), rest) {
            ("show", []) => Ok(Command::Show { file: None }),
            ("show", [file]) => Ok(Command::Show {
                file: Some(PathBuf::from(file)),
            }),
            ("new", [file]) => Ok(Command::New {
                file: PathBuf::from(file),
                name: None,
            }),
            ("new", [file, name]) => Ok(Command::New {
                file: PathBuf::from(file),
                name: Some(name.clone()),
            }),
            ("set", [file, assignments @ ..]) if !assignments.is_empty() => Ok(Command::Set {
                file: PathBuf::from(file),
                assignments: assignments
                    .iter()
                    .map(|a| parse_assignment(a))
                    .collect::<Result<_, _>>()?,
            }),
            ("check", [kind, value, file @ ..]) if file.len() <= 1 => Ok(Command::Check {
                kind: kind.parse()?,
                value: parse_number(value)?,
                file: file.first().map(PathBuf::from),
            }),
            ("component", [file, component, state]) => Ok(Command::Component {
                file: PathBuf::from(file),
                component: Component::from_name(component)
                    .ok_or_else(|| usage(&format!("Unknown component '{}'", component)))?,
                state: ComponentState::from_name(state)
                    .ok_or_else(|| usage(&format!("Unknown component state '{}'", state)))?,
            }),
            ("show" | "new" | "set" | "check" | "component", _) => {
                Err(usage(&format!("Wrong arguments for '{}'", name)))
            }
            _ => Err(usage(&format!("Unknown command '{}'", name))),
        }
    }

    /// Execute the command, writing results to `out`
    pub fn run(self, out: &mut impl Write) -> Result<(), CliError> {
        match self {
            Command::Show { file } => {
                let design = load_or_default(file.as_deref())?;
                print_design(&design, out)?;
            }
            Command::New { file, name } => {
                let name = name.unwrap_or_else(|| design_name(&file));
                let design = Design::new(name);
                design.save(&file)?;
                print_design(&design, out)?;
            }
            Command::Set { file, assignments } => {
                let mut design = if file.exists() {
                    Design::load(&file)?
                } else {
                    Design::new(design_name(&file))
                };

                for (kind, value) in assignments {
                    match design.set_value(kind, value) {
                        Ok(()) => writeln!(out, "{}: set to {}", kind, value)?,
                        Err(e @ ParameterError::OutOfRange { .. }) => {
                            tracing::warn!("{}", e);
                            writeln!(
                                out,
                                "{}: rejected {}, keeping {} {}",
                                kind,
                                value,
                                design.parameters.value(kind),
                                design.parameters.range_hint(kind)
                            )?;
                        }
                        Err(e) => return Err(e.into()),
                    }
                }

                design.save(&file)?;
                print_design(&design, out)?;
            }
            Command::Check { kind, value, file } => {
                let design = load_or_default(file.as_deref())?;
                let verdict = if design.parameters.is_valid(kind, value) {
                    "valid"
                } else {
                    "invalid"
                };
                writeln!(
                    out,
                    "{} = {} is {} {}",
                    kind,
                    value,
                    verdict,
                    design.parameters.range_hint(kind)
                )?;
            }
            Command::Component {
                file,
                component,
                state,
            } => {
                let mut design = Design::load(&file)?;
                design.components.set_state(component, state);
                design.save(&file)?;
                print_design(&design, out)?;
            }
        }
        Ok(())
    }
}

fn load_or_default(file: Option<&Path>) -> Result<Design, CliError> {
    Ok(match file {
        Some(path) => Design::load(path)?,
        None => Design::default(),
    })
}

fn design_name(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| Design::default().name)
}

fn print_design(design: &Design, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", design.name)?;
    for (kind, parameter) in design.parameters.iter() {
        let note = if design.components.is_active(kind) {
            ""
        } else {
            "  [missing]"
        };
        writeln!(
            out,
            "  {:<18}{:>8} {}{}",
            kind.label(),
            parameter.value(),
            design.parameters.range_hint(kind),
            note
        )?;
    }
    Ok(())
}
