use anyhow::Context;
use inquire::{InquireError, Text};
use skynow_core::{Label, Language, Locator, Session, i18n::label, render};

const HELP: &str = ":pt / :en switch language, :q quits";

/// What a line typed at the prompt asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Language(Language),
    Search(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        ":q" | ":quit" => Input::Quit,
        ":pt" => Input::Language(Language::Pt),
        ":en" => Input::Language(Language::En),
        _ => Input::Search(line),
    }
}

fn show(session: &Session) {
    println!();
    print!("{}", render(session.view(), chrono::Local::now().time()));
}

/// Prompt loop: locate once, then search until the user quits.
pub async fn run(mut session: Session, locator: &dyn Locator) -> anyhow::Result<()> {
    session.mount(locator).await;

    loop {
        session.drain_backgrounds();
        show(&session);

        let language = session.view().language();
        let answer = Text::new(label(Label::Title, language))
            .with_placeholder(label(Label::Placeholder, language))
            .with_initial_value(session.view().city())
            .with_help_message(HELP)
            .prompt();

        let line = match answer {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read search input"),
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Language(language) => session.set_language(language),
            Input::Search(city) => {
                if let Some(ticket) = session.submit(city) {
                    show(&session);
                    session.fetch(ticket).await;
                }
            }
        }
    }

    Ok(())
}
