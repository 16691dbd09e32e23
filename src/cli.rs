// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn pin_arg() -> Arg {
    Arg::new("pin")
        .long("pin")
        .value_name("PIN")
        .help("Parent PIN, needed while the lock is on")
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).value_name("ID")
}

fn points_arg(name: &'static str, default: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(u64))
        .default_value(default)
}

pub fn build_cli() -> Command {
    Command::new("copperone")
        .about("CopperOne: pocket money, goals, chores and rewards for kids, with a local money tutor")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Keep everything in memory for this run; nothing is saved"),
        )
        .subcommand(json_flags(Command::new("status").about("Balance, points, streak and level")))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record money in or out")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["in", "out"])
                                .default_value("in"),
                        )
                        .arg(Arg::new("category").long("category").default_value("Other"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD or M/D/YYYY (default today)"),
                        )
                        .arg(pin_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("Newest first")
                        .arg(Arg::new("type").long("type").value_parser(["in", "out"]))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("goal")
                .about("Savings goals")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("subtitle").long("subtitle").default_value(""))
                        .arg(Arg::new("target").long("target").required(true))
                        .arg(points_arg("points", "0")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("fund")
                        .about("Move money from the balance into a goal")
                        .arg(id_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(pin_arg()),
                )
                .subcommand(
                    Command::new("complete")
                        .about("Complete a fully funded goal")
                        .arg(id_arg())
                        .arg(pin_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("subtitle").long("subtitle"))
                        .arg(Arg::new("target").long("target"))
                        .arg(
                            Arg::new("points")
                                .long("points")
                                .value_parser(value_parser!(u64)),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("chore")
                .about("Chores that earn points")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("title").long("title").required(true))
                        .arg(Arg::new("description").long("description").default_value(""))
                        .arg(points_arg("points", "10")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(
                    Command::new("complete")
                        .arg(id_arg())
                        .arg(Arg::new("by").long("by").help("Who did it"))
                        .arg(pin_arg()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(id_arg())
                        .arg(Arg::new("title").long("title"))
                        .arg(Arg::new("description").long("description"))
                        .arg(
                            Arg::new("points")
                                .long("points")
                                .value_parser(value_parser!(u64)),
                        ),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("reward")
                .about("Reward shop")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("redeem").arg(id_arg())),
        )
        .subcommand(
            Command::new("achievement")
                .about("Achievements")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("unlock").arg(id_arg())),
        )
        .subcommand(
            Command::new("points")
                .about("Grant or take away points")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("amount")
                                .required(true)
                                .value_parser(value_parser!(u64)),
                        )
                        .arg(pin_arg()),
                )
                .subcommand(
                    Command::new("deduct")
                        .arg(
                            Arg::new("amount")
                                .required(true)
                                .value_parser(value_parser!(u64)),
                        )
                        .arg(pin_arg()),
                ),
        )
        .subcommand(
            Command::new("xp").about("Experience").subcommand(
                Command::new("add")
                    .arg(
                        Arg::new("amount")
                            .required(true)
                            .value_parser(value_parser!(u64)),
                    )
                    .arg(pin_arg()),
            ),
        )
        .subcommand(
            Command::new("pin")
                .about("Parental PIN lock")
                .subcommand(
                    Command::new("enable")
                        .about("Turn the lock on or change the PIN")
                        .arg(Arg::new("new").long("new").required(true).value_name("PIN"))
                        .arg(
                            Arg::new("confirm")
                                .long("confirm")
                                .required(true)
                                .value_name("PIN"),
                        )
                        .arg(pin_arg().help("Current PIN, when changing it")),
                )
                .subcommand(Command::new("disable").arg(pin_arg()))
                .subcommand(json_flags(Command::new("status"))),
        )
        .subcommand(
            Command::new("account")
                .about("Local account")
                .subcommand(
                    Command::new("signup")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true))
                        .arg(Arg::new("child-name").long("child-name").default_value(""))
                        .arg(
                            Arg::new("child-age")
                                .long("child-age")
                                .value_parser(value_parser!(u8)),
                        )
                        .arg(Arg::new("email").long("email")),
                )
                .subcommand(
                    Command::new("login")
                        .arg(Arg::new("username").long("username").required(true))
                        .arg(Arg::new("password").long("password").required(true)),
                )
                .subcommand(Command::new("logout"))
                .subcommand(json_flags(Command::new("whoami"))),
        )
        .subcommand(
            Command::new("learn")
                .about("Financial literacy modules")
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("toggle").arg(id_arg())),
        )
        .subcommand(
            Command::new("report")
                .about("Spending analytics")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("This month against last month")
                        .arg(Arg::new("today").long("today")),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Where the money went")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize))
                                .default_value("5"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("daily")
                        .about("Spending per day")
                        .arg(
                            Arg::new("days")
                                .long("days")
                                .value_parser(value_parser!(u32).range(1..=366))
                                .default_value("7"),
                        )
                        .arg(Arg::new("today").long("today")),
                )),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true)),
            ),
        )
        .subcommand(
            Command::new("chat")
                .about("Ask Penny, the money tutor")
                .subcommand(
                    Command::new("ask")
                        .about("Ask a question, or start a conversation when none is given")
                        .arg(Arg::new("text").num_args(1..).trailing_var_arg(true))
                        .arg(
                            Arg::new("json")
                                .long("json")
                                .action(ArgAction::SetTrue)
                                .help("Print the structured reply"),
                        ),
                )
                .subcommand(json_flags(Command::new("models")))
                .subcommand(Command::new("use").arg(id_arg()))
                .subcommand(
                    Command::new("scrub")
                        .about("Show what would be sent after redaction")
                        .arg(Arg::new("text").required(true).num_args(1..)),
                ),
        )
        .subcommand(
            Command::new("reset")
                .about("Wipe the ledger and learning progress")
                .arg(pin_arg()),
        )
        .subcommand(Command::new("doctor").about("Check ledger consistency and the tutor backend"))
}
