//! desk-runner: headless runner for the civic complaint desk.
//!
//! Usage:
//!   desk-runner --db complaints.db --role admin --user alice --ipc-mode
//!   desk-runner --config desk.json --watch --polls 10
//!   desk-runner --db complaints.db            (prints a summary and exits)
//!
//! In IPC mode every stdin line is one JSON `DeskCommand` and every reply
//! is one JSON line on stdout.

use anyhow::Result;
use civic_desk_core::{
    command::reply_to_line,
    config::DeskConfig,
    desk::ComplaintDesk,
    session::{Role, Session},
    store::ComplaintStore,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let watch = args.iter().any(|a| a == "--watch");
    let polls = parse_arg(&args, "--polls", u64::MAX);

    let mut config = match arg_value(&args, "--config") {
        Some(path) => DeskConfig::load(path)?,
        None => DeskConfig::default(),
    };
    if let Some(db) = arg_value(&args, "--db") {
        config.db_path = db.to_string();
    }
    if let Some(dir) = arg_value(&args, "--photo-dir") {
        config.photo_dir = dir.to_string();
    }
    let user = arg_value(&args, "--user").unwrap_or("anonymous").to_string();
    let role: Role = arg_value(&args, "--role").unwrap_or("citizen").parse()?;

    if !ipc_mode {
        println!("Civic Desk — desk-runner");
        println!("  db:         {}", config.db_path);
        println!("  photo_dir:  {}", config.photo_dir);
        println!("  sla_hours:  {}", config.default_sla_hours);
        println!("  session:    {user} ({role})");
        println!();
    }

    let desk = ComplaintDesk::build(config)?;
    let session = Session::open(user, role, desk.now());

    let outcome = if ipc_mode {
        let stdin = io::stdin();
        run_ipc_loop(&desk, &session, stdin.lock(), io::stdout())
    } else if watch {
        run_watch_loop(&desk, polls)
    } else {
        print_summary(&desk)
    };

    session.close();
    outcome
}

fn run_ipc_loop<S: ComplaintStore, R: BufRead, W: Write>(
    desk: &ComplaintDesk<S>,
    session: &Session,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        let bytes_read = input.read_until(b'\n', &mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let Some(reply) = reply_to_line(desk, session, &buffer) else {
            continue;
        };
        if let Some(err) = &reply.error {
            log::debug!("command failed: {}", err.message);
        }
        writeln!(output, "{}", serde_json::to_string(&reply)?)?;
        output.flush()?;
    }
    Ok(())
}

/// Client-driven polling: re-read the summary every poll interval.
fn run_watch_loop(desk: &ComplaintDesk, polls: u64) -> Result<()> {
    let interval = Duration::from_secs(desk.config().poll_interval_secs);
    for poll in 0..polls {
        if poll > 0 {
            std::thread::sleep(interval);
        }
        print_summary(desk)?;
    }
    Ok(())
}

fn print_summary(desk: &ComplaintDesk) -> Result<()> {
    let summary = desk.summary()?;
    println!("=== Complaints @ {} ===", desk.now().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  total:        {}", summary.total);
    println!("  open:         {}", summary.open);
    println!("  in progress:  {}", summary.in_progress);
    println!("  resolved:     {}", summary.resolved);
    println!("  overdue:      {}", summary.overdue);
    println!("  unassigned:   {}", summary.unassigned);

    let overdue: Vec<_> = desk
        .list_complaints()?
        .into_iter()
        .filter(|v| v.overdue)
        .collect();
    for view in &overdue {
        println!(
            "  ⚠ {} \"{}\" opened {} ({}h SLA)",
            view.complaint.complaint_id,
            view.complaint.title,
            view.complaint.created_at.format("%Y-%m-%d %H:%M"),
            view.complaint.sla_hours,
        );
    }
    println!();
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str, default: T) -> T {
    arg_value(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Cursor;

    #[test]
    fn undecodable_line_gets_a_reply_and_the_loop_continues() {
        let desk = ComplaintDesk::build(DeskConfig::default_test()).unwrap();
        let session = Session::open("clerk", Role::Staff, desk.now());
        let input = Cursor::new(b"{\"cmd\":\"summary\"}\n\xff\xfe bad\n\n{\"cmd\":\"summary\"}\n".to_vec());
        let mut output = Vec::new();

        run_ipc_loop(&desk, &session, input, &mut output).unwrap();

        let replies: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0]["ok"], true);
        assert_eq!(replies[1]["ok"], false);
        assert_eq!(replies[1]["error"]["kind"], "validation");
        assert_eq!(replies[2]["ok"], true);
        assert_eq!(replies[2]["data"]["total"], 0);
    }
}
