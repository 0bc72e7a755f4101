use bunk_tracker::{
    AppConfig, ClassEntry, Day, Slot, Subject, TIME_SLOTS, Tracker, TrackerError,
    export_attendance_csv, load_subjects_from_json, logging, save_subjects_to_json,
};
use std::io::{self, Write};

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let sep = {
        let mut s = String::from("+");
        for w in &widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    };

    let push_row = |out: &mut String, cells: &[&str]| {
        out.push('|');
        for (ci, cell) in cells.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, headers);
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        push_row(&mut out, &cells);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_subjects(subjects: &[Subject]) -> String {
    if subjects.is_empty() {
        return "No subjects yet. Use 'add <name...>'.".to_string();
    }
    let rows: Vec<Vec<String>> = subjects
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            vec![
                idx.to_string(),
                s.name.clone(),
                s.code.clone(),
                if s.professor.is_empty() {
                    "No Prof Info".to_string()
                } else {
                    s.professor.clone()
                },
                s.attended.to_string(),
                s.conducted.to_string(),
                format!("{:.1}%", s.percentage()),
                s.status().to_string(),
            ]
        })
        .collect();
    render_text_table(
        &[
            "#",
            "name",
            "code",
            "professor",
            "attended",
            "conducted",
            "percent",
            "status",
        ],
        &rows,
    )
}

fn render_classes(classes: &[ClassEntry]) -> String {
    let rows: Vec<Vec<String>> = classes
        .iter()
        .map(|c| {
            vec![
                c.time.start().to_string(),
                c.time.display().to_string(),
                c.subject.clone(),
                c.code.clone(),
                c.professor.clone(),
            ]
        })
        .collect();
    render_text_table(&["start", "slot", "subject", "code", "professor"], &rows)
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  list|show                          Show all subjects with attendance\n  add <name...>                      Add a subject\n  delete <i>                         Delete subject i\n  present <i>                        Mark present in subject i\n  absent <i>                         Mark absent in subject i\n  rename <i> <text...>               Set subject name\n  code <i> <text...>                 Set subject code\n  prof <i> <text...>                 Set professor\n  slots                              List the weekly slot catalog\n  slot <i> <day> <time...>           Toggle a slot (time as '08:00 T' or full range)\n  schedule <i> [clear]               Show or clear subject i's schedule\n  day <day>                          Classes on a day\n  today                              Classes today\n  timetable                          Whole week\n  assign <i> <YYYY-MM-DD> <title...> Add an assignment\n  done <i> <j>                       Complete assignment j of subject i\n  pending                            Pending assignments\n  summary                            Safe bunk prediction\n  conflicts                          Slots claimed by several subjects\n  save json <path>                   Write subjects to a JSON file\n  load json <path>                   Replace subjects from a JSON file\n  export csv <path>                  Write an attendance report\n  quit|exit                          Exit"
    );
}

fn print_slot_catalog() {
    println!("Days: {}", Day::ALL.map(|d| d.as_str()).join(", "));
    let rows: Vec<Vec<String>> = TIME_SLOTS
        .iter()
        .map(|t| vec![t.label().to_string(), t.display().to_string()])
        .collect();
    println!("{}", render_text_table(&["label", "time"], &rows));
}

fn report(err: &TrackerError) {
    match err {
        TrackerError::Semester(e) => println!("Error: {}", e),
        TrackerError::Persistence(e) => {
            println!("Warning: change kept in memory but not saved: {}", e)
        }
    }
}

fn parse_index(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|s| s.parse::<usize>().ok())
}

fn main() -> anyhow::Result<()> {
    logging::init("warn");
    let config = AppConfig::from_env()?;
    let mut tracker = Tracker::open(config.open_store()?)?;

    println!("Bunk Tracker (CLI) - type 'help' for commands\n");
    println!("{}", tracker.forecast());
    println!("{}", render_subjects(tracker.subjects()));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "list" | "show" => println!("{}", render_subjects(tracker.subjects())),
            "add" => {
                let rest: Vec<&str> = parts.collect();
                if rest.is_empty() {
                    println!("Usage: add <name...>");
                    continue;
                }
                let name = rest.join(" ");
                match tracker.add_subject(name.as_str(), "", "") {
                    Ok(idx) => println!("Added subject {}: {}.", idx, name),
                    Err(e) => report(&e),
                }
            }
            "delete" => match parse_index(parts.next()) {
                Some(idx) => match tracker.remove_subject(idx) {
                    Ok(removed) => {
                        println!("Deleted subject {}: {}.", idx, removed.name);
                    }
                    Err(e) => report(&e),
                },
                None => println!("Usage: delete <i>"),
            },
            "present" | "absent" => match parse_index(parts.next()) {
                Some(idx) => {
                    let result = if cmd == "present" {
                        tracker.mark_present(idx)
                    } else {
                        tracker.mark_absent(idx)
                    };
                    match result {
                        Ok(_) => {
                            if let Ok(subject) = tracker.semester().subject(idx) {
                                println!(
                                    "Marked {} in {}: {}/{} ({:.1}%). {}",
                                    cmd,
                                    subject.name,
                                    subject.attended,
                                    subject.conducted,
                                    subject.percentage(),
                                    subject.status()
                                );
                            }
                        }
                        Err(e) => report(&e),
                    }
                }
                None => println!("Usage: {} <i>", cmd),
            },
            "rename" | "code" | "prof" => {
                let idx = parse_index(parts.next());
                let rest: Vec<&str> = parts.collect();
                let Some(idx) = idx else {
                    println!("Usage: {} <i> <text...>", cmd);
                    continue;
                };
                let current = match tracker.semester().subject(idx) {
                    Ok(subject) => subject.clone(),
                    Err(e) => {
                        println!("Error: {}", e);
                        continue;
                    }
                };
                let text = rest.join(" ");
                let (name, code, professor) = match cmd {
                    "rename" => (text, current.code, current.professor),
                    "code" => (current.name, text, current.professor),
                    _ => (current.name, current.code, text),
                };
                match tracker.edit_details(idx, name, code, professor) {
                    Ok(_) => println!("Details updated."),
                    Err(e) => report(&e),
                }
            }
            "slots" => print_slot_catalog(),
            "slot" => {
                let idx = parse_index(parts.next());
                let day = parts.next();
                let time: Vec<&str> = parts.collect();
                match (idx, day, time.is_empty()) {
                    (Some(idx), Some(day), false) => {
                        let slot = match Slot::parse(day, &time.join(" ")) {
                            Ok(slot) => slot,
                            Err(e) => {
                                println!("Error: {}", e);
                                continue;
                            }
                        };
                        match tracker.toggle_slot(idx, slot) {
                            Ok(true) => println!("Selected {}.", slot),
                            Ok(false) => println!("Cleared {}.", slot),
                            Err(e) => report(&e),
                        }
                    }
                    _ => println!("Usage: slot <i> <day> <time...>"),
                }
            }
            "schedule" => {
                let Some(idx) = parse_index(parts.next()) else {
                    println!("Usage: schedule <i> [clear]");
                    continue;
                };
                match parts.next() {
                    Some("clear") => match tracker.set_schedule(idx, Vec::new()) {
                        Ok(_) => println!("Schedule cleared."),
                        Err(e) => report(&e),
                    },
                    Some(other) => {
                        println!("Unknown schedule command '{}'.", other);
                        println!("Usage: schedule <i> [clear]");
                    }
                    None => match tracker.semester().subject(idx) {
                        Ok(subject) if subject.schedule().is_empty() => {
                            println!("{} has no scheduled slots.", subject.name)
                        }
                        Ok(subject) => {
                            for slot in subject.schedule() {
                                println!("  {}", slot);
                            }
                        }
                        Err(e) => println!("Error: {}", e),
                    },
                }
            }
            "day" => match parts.next().map(str::parse::<Day>) {
                Some(Ok(day)) => {
                    let classes = tracker.semester().classes_on(day);
                    if classes.is_empty() {
                        println!("Free Day!");
                    } else {
                        println!("{}", render_classes(&classes));
                    }
                }
                Some(Err(e)) => println!("Error: {}", e),
                None => println!("Usage: day <day>"),
            },
            "today" => {
                let classes = tracker.semester().classes_today();
                if classes.is_empty() {
                    println!("No classes today!");
                } else {
                    println!("{}", render_classes(&classes));
                }
            }
            "timetable" => {
                for day in tracker.semester().timetable() {
                    println!("{}:", day.day);
                    if day.classes.is_empty() {
                        println!("  Free Day!");
                    } else {
                        println!("{}", render_classes(&day.classes));
                    }
                }
            }
            "assign" => {
                let idx = parse_index(parts.next());
                let deadline = parts.next();
                let title: Vec<&str> = parts.collect();
                match (idx, deadline, title.is_empty()) {
                    (Some(idx), Some(deadline), false) => {
                        match tracker.add_assignment(idx, title.join(" "), deadline) {
                            Ok(j) => println!("Added assignment {} to subject {}.", j, idx),
                            Err(e) => report(&e),
                        }
                    }
                    _ => println!("Usage: assign <i> <YYYY-MM-DD> <title...>"),
                }
            }
            "done" => {
                let idx = parse_index(parts.next());
                let assignment = parse_index(parts.next());
                match (idx, assignment) {
                    (Some(idx), Some(j)) => match tracker.complete_assignment(idx, j) {
                        Ok(_) => println!("Assignment {} of subject {} completed.", j, idx),
                        Err(e) => report(&e),
                    },
                    _ => println!("Usage: done <i> <j>"),
                }
            }
            "pending" => {
                let pending = tracker.semester().pending_assignments();
                if pending.is_empty() {
                    println!("No pending work.");
                } else {
                    let rows: Vec<Vec<String>> = pending
                        .iter()
                        .map(|p| {
                            vec![
                                format!("{} {}", p.subject_index, p.assignment_index),
                                p.title.clone(),
                                p.subject.clone(),
                                p.deadline.clone(),
                            ]
                        })
                        .collect();
                    println!(
                        "{}",
                        render_text_table(&["i j", "title", "subject", "deadline"], &rows)
                    );
                }
            }
            "summary" => println!("{}", tracker.forecast()),
            "conflicts" => {
                let conflicts = tracker.semester().conflicts();
                if conflicts.is_empty() {
                    println!("No conflicting slots.");
                }
                for conflict in conflicts {
                    let names = conflict
                        .subjects
                        .iter()
                        .filter_map(|i| tracker.semester().subject(*i).ok())
                        .map(|s| s.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    println!("{}: {}", conflict.slot, names);
                }
            }
            "save" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match save_subjects_to_json(tracker.subjects(), path)
                {
                    Ok(_) => println!("Subjects saved to {}.", path),
                    Err(e) => println!("Error saving subjects: {}", e),
                },
                _ => println!("Usage: save json <path>"),
            },
            "load" => match (parts.next(), parts.next()) {
                (Some("json"), Some(path)) => match load_subjects_from_json(path) {
                    Ok(subjects) => {
                        match tracker.replace_subjects(subjects) {
                            Ok(_) => println!("Subjects loaded from {}.", path),
                            Err(e) => {
                                println!(
                                    "Subjects loaded from {} but not saved to the store.",
                                    path
                                );
                                report(&e);
                            }
                        }
                        println!("{}", render_subjects(tracker.subjects()));
                    }
                    Err(e) => println!("Error loading subjects: {}", e),
                },
                _ => println!("Usage: load json <path>"),
            },
            "export" => match (parts.next(), parts.next()) {
                (Some("csv"), Some(path)) => match export_attendance_csv(tracker.subjects(), path) {
                    Ok(_) => println!("Attendance report written to {}.", path),
                    Err(e) => println!("Error exporting report: {}", e),
                },
                _ => println!("Usage: export csv <path>"),
            },
            _ => {
                println!("Unknown command. Type 'help'.");
            }
        }
    }
    Ok(())
}
