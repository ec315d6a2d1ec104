use crawler_core::{Msg, Platform};

/// One parsed operator command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Messages to feed to `update`, in order.
    Messages(Vec<Msg>),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  open <platform>                          load a platform panel
  set <platform> <param> <value>           move a slider
  drag <platform> <param> <v1> <v2> ...    move a slider through several values
  link <platform> <pair> <member> <value>  type an exact linked weight
  add <platform> <collection> <text...>    add a keyword
  remove <platform> <collection> <text...> remove a keyword
  save <platform>                          store the platform configuration
  start <platform>                         start the platform crawler
  stop                                     stop the running crawler
  refresh                                  poll crawler status now
  stats <platform>                         fetch crawler statistics
  show                                     print the full console state
  help                                     print this help
  quit                                     leave the console
platforms: youtube (yt), github (gh)";

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    if verb.starts_with('#') {
        return Ok(None);
    }
    let args: Vec<&str> = words.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "open" => {
            let [platform] = exact::<1>(verb, &args)?;
            single(Msg::PanelActivated(platform_arg(platform)?))
        }
        "set" => {
            let [platform, key, value] = exact::<3>(verb, &args)?;
            single(Msg::SliderMoved {
                platform: platform_arg(platform)?,
                key: key.to_string(),
                value: number_arg(value)?,
            })
        }
        "drag" => {
            if args.len() < 3 {
                return Err("usage: drag <platform> <param> <v1> <v2> ...".to_string());
            }
            let platform = platform_arg(args[0])?;
            let key = args[1];
            let messages = args[2..]
                .iter()
                .map(|value| {
                    Ok(Msg::SliderMoved {
                        platform,
                        key: key.to_string(),
                        value: number_arg(value)?,
                    })
                })
                .collect::<Result<Vec<_>, String>>()?;
            Command::Messages(messages)
        }
        "link" => {
            let [platform, pair, member, value] = exact::<4>(verb, &args)?;
            single(Msg::LinkedValueSet {
                platform: platform_arg(platform)?,
                pair: pair.to_string(),
                member: member.to_string(),
                value: number_arg(value)?,
            })
        }
        "add" | "remove" => {
            if args.len() < 3 {
                return Err(format!("usage: {verb} <platform> <collection> <text...>"));
            }
            let platform = platform_arg(args[0])?;
            let collection = args[1].to_string();
            let text = args[2..].join(" ");
            single(if verb.eq_ignore_ascii_case("add") {
                Msg::KeywordAdded {
                    platform,
                    collection,
                    text,
                }
            } else {
                Msg::KeywordRemoved {
                    platform,
                    collection,
                    text,
                }
            })
        }
        "save" => {
            let [platform] = exact::<1>(verb, &args)?;
            single(Msg::SaveClicked(platform_arg(platform)?))
        }
        "start" => {
            let [platform] = exact::<1>(verb, &args)?;
            single(Msg::StartClicked(platform_arg(platform)?))
        }
        "stats" => {
            let [platform] = exact::<1>(verb, &args)?;
            single(Msg::StatisticsRequested(platform_arg(platform)?))
        }
        "stop" => single(Msg::StopClicked),
        "refresh" => single(Msg::RefreshClicked),
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(Some(command))
}

fn single(msg: Msg) -> Command {
    Command::Messages(vec![msg])
}

fn exact<'a, const N: usize>(verb: &str, args: &[&'a str]) -> Result<[&'a str; N], String> {
    <[&str; N]>::try_from(args)
        .map_err(|_| format!("'{verb}' takes {N} argument(s), got {}", args.len()))
}

fn platform_arg(text: &str) -> Result<Platform, String> {
    text.parse()
}

fn number_arg(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("'{text}' is not a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_are_ignored() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("# note"), Ok(None));
    }

    #[test]
    fn set_produces_slider_message() {
        assert_eq!(
            parse("set yt max_retries 4"),
            Ok(Some(Command::Messages(vec![Msg::SliderMoved {
                platform: Platform::YouTube,
                key: "max_retries".to_string(),
                value: 4.0,
            }])))
        );
    }

    #[test]
    fn drag_produces_one_message_per_value() {
        let Ok(Some(Command::Messages(messages))) =
            parse("drag youtube max_qualified_kols 100 200 300 400 500")
        else {
            panic!("drag did not parse");
        };
        assert_eq!(messages.len(), 5);
        assert_eq!(
            messages.last(),
            Some(&Msg::SliderMoved {
                platform: Platform::YouTube,
                key: "max_qualified_kols".to_string(),
                value: 500.0,
            })
        );
    }

    #[test]
    fn keyword_text_keeps_inner_spaces() {
        assert_eq!(
            parse("add youtube priority_high Sora AI"),
            Ok(Some(Command::Messages(vec![Msg::KeywordAdded {
                platform: Platform::YouTube,
                collection: "priority_high".to_string(),
                text: "Sora AI".to_string(),
            }])))
        );
    }

    #[test]
    fn link_parses_pair_and_member() {
        assert_eq!(
            parse("link yt engagement_weights like_weight 0.7"),
            Ok(Some(Command::Messages(vec![Msg::LinkedValueSet {
                platform: Platform::YouTube,
                pair: "engagement_weights".to_string(),
                member: "like_weight".to_string(),
                value: 0.7,
            }])))
        );
    }

    #[test]
    fn bad_input_is_explained() {
        assert!(parse("start twitter").unwrap_err().contains("unknown platform"));
        assert!(parse("set gh min_stars lots").unwrap_err().contains("not a number"));
        assert!(parse("save").unwrap_err().contains("takes 1 argument"));
        assert!(parse("dance").unwrap_err().contains("unknown command"));
    }

    #[test]
    fn bare_commands() {
        assert_eq!(parse("stop"), Ok(Some(Command::Messages(vec![Msg::StopClicked]))));
        assert_eq!(parse("SHOW"), Ok(Some(Command::Show)));
        assert_eq!(parse("exit"), Ok(Some(Command::Quit)));
    }
}
