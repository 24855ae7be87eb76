//! 交互模式（菜单式 Shell）
//!
//! 逐个询问 J1..J6 目标、相对模式、回零宏和进给速度，
//! 先预览将要下发的命令，确认后再发送。

use anyhow::{Context, Result};
use inquire::validator::Validation;
use inquire::{Confirm, CustomType, CustomUserError, InquireError, Select, Text};
use jointctl_driver::Dispatcher;
use jointctl_gcode::{Joint, JointInputs, MoveRequest};
use jointctl_transport::TransportConfig;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use crate::commands::CliConfig;
use crate::utils;

/// 交互模式的默认进给速度
const SHELL_FEED: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    MoveJoints,
    Quit,
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::MoveJoints => write!(f, "Move joints (J1..J6)"),
            MenuItem::Quit => write!(f, "Quit"),
        }
    }
}

/// 运行交互菜单，直到用户选择退出或按 Esc / Ctrl+C
pub fn run_shell(config: &CliConfig, transport: TransportConfig, dry_run: bool, verbose: bool) -> Result<()> {
    println!("jointctl shell ({})", transport.target());
    if dry_run {
        println!("Dry-run: nothing will be sent");
    }

    let interrupt = utils::interrupt_flag()?;
    let dispatcher = Dispatcher::new(transport).with_interrupt(Arc::clone(&interrupt));

    loop {
        let choice = match Select::new("What next?", vec![MenuItem::MoveJoints, MenuItem::Quit]).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("menu prompt failed"),
        };

        match choice {
            MenuItem::Quit => break,
            MenuItem::MoveJoints => {
                interrupt.store(false, Ordering::SeqCst);
                match move_joints(config, &dispatcher, dry_run, verbose) {
                    Ok(()) => {},
                    Err(err) if is_cancel(&err) => println!("Move cancelled."),
                    Err(err) => eprintln!("Error: {err:#}"),
                }
            },
        }
    }

    println!("Bye");
    Ok(())
}

fn move_joints(config: &CliConfig, dispatcher: &Dispatcher, dry_run: bool, verbose: bool) -> Result<()> {
    let mut joints = JointInputs::new();
    for joint in Joint::ALL {
        let input = Text::new(&format!("{joint} target (blank to skip):"))
            .with_validator(validate_target)
            .prompt()?;
        joints.set(joint, parse_optional(&input).ok().flatten());
    }

    if joints.is_empty() {
        println!("No joints specified, nothing to do.");
        return Ok(());
    }

    let relative = Confirm::new("Relative move?").with_default(true).prompt()?;
    let home_first = Confirm::new(&format!("Send {} before move?", config.home_macro))
        .with_default(true)
        .prompt()?;
    let feed = CustomType::<f64>::new("Feed rate:")
        .with_default(SHELL_FEED)
        .with_error_message("Please enter a number")
        .prompt()?;

    let mut builder = MoveRequest::builder().joints(joints).relative(relative).feed(feed);
    if home_first {
        builder = builder.pre_command(config.home_macro.clone());
    }
    let request = builder.build().context("resolve failed")?;

    let preview = dispatcher.dispatch(&request, true)?;
    utils::print_outcome(&preview, verbose);

    if dry_run {
        return Ok(());
    }

    if !Confirm::new("Proceed with this move?").with_default(true).prompt()? {
        println!("Move cancelled.");
        return Ok(());
    }

    let outcome = dispatcher.dispatch(&request, false)?;
    utils::print_outcome(&outcome, verbose);
    Ok(())
}

fn validate_target(input: &str) -> Result<Validation, CustomUserError> {
    Ok(match parse_optional(input) {
        Ok(_) => Validation::Valid,
        Err(msg) => Validation::Invalid(msg.into()),
    })
}

/// 空输入表示该关节不移动
fn parse_optional(input: &str) -> Result<Option<f64>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    match input.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(format!("'{input}' is not a number")),
    }
}

fn is_cancel(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}
