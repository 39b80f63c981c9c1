use anyhow::Result;
use async_trait::async_trait;
use bkp_core::actions::{Confirm, ConfirmRequest, Decision, Navigator, Notifier};
use bkp_core::navigation::NavigationTarget;
use bkp_utils::term::{print_error, print_info};
use reqwest::Url;
use std::io::{BufRead, Write, stdin, stdout};
use tracing::{debug, error};

fn is_accepted(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt(request: &ConfirmRequest) -> Result<String> {
    let mut out = stdout().lock();
    writeln!(out, "{}", request.title)?;
    write!(out, "{} [y/N] ", request.body)?;
    out.flush()?;

    let mut answer = String::new();
    stdin().lock().read_line(&mut answer)?;
    Ok(answer)
}

/// Asks on the terminal. Anything other than an explicit yes, including a
/// closed stdin, dismisses the operation.
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, request: ConfirmRequest) -> Decision {
        if self.assume_yes {
            debug!("auto accepting: {}", request.body);
            return Decision::Accepted;
        }

        let answer = tokio::task::spawn_blocking(move || prompt(&request)).await;
        match answer {
            Ok(Ok(answer)) if is_accepted(&answer) => Decision::Accepted,
            Ok(Ok(_)) => Decision::Dismissed,
            Ok(Err(e)) => {
                error!("unable to read the answer: {e}");
                Decision::Dismissed
            }
            Err(e) => {
                error!("confirmation prompt failed: {e}");
                Decision::Dismissed
            }
        }
    }
}

/// Builds the url of a console location: `<base>/#<path>?<query>`.
pub fn console_url(base_url: &str, target: &NavigationTarget) -> Result<Url> {
    let mut route = Url::parse("route://console/")?;
    route.set_path(&target.pathname);
    if !target.query.is_empty() {
        route.query_pairs_mut().extend_pairs(&target.query);
    }

    let mut fragment = route.path().to_owned();
    if let Some(query) = route.query() {
        fragment.push('?');
        fragment.push_str(query);
    }

    let mut url = Url::parse(base_url)?;
    url.set_fragment(Some(&fragment));
    Ok(url)
}

/// Prints the console url of a location instead of opening it.
pub struct ConsoleNavigator {
    base_url: String,
}

impl ConsoleNavigator {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }
}

impl Navigator for ConsoleNavigator {
    fn go_to(&self, target: NavigationTarget) -> Result<()> {
        let url = console_url(&self.base_url, &target)?;
        print_info(url.as_str())
    }
}

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_error(&self, message: &str) {
        if let Err(e) = print_error(message) {
            eprintln!("{message} ({e})");
        }
    }
}
