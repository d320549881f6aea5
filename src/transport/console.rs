//! Console presentation: a numbered menu over the shelter actions.

use crate::app::outcome::{Notice, Outcome, Table};
use crate::app::shelter_service::ShelterService;
use crate::domain::command::{Action, FormInput};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const EMPTY_TABLE: &str = "(No records found)";

/// Menu sections: heading and the actions under it.
const SECTIONS: &[(&str, &[Action])] = &[
    (
        "Pet Management",
        &[
            Action::AddPet,
            Action::ViewPets,
            Action::UpdatePetName,
            Action::DeletePet,
            Action::SearchPets,
        ],
    ),
    ("Adopter Management", &[Action::AddAdopter, Action::ViewAdopters]),
    (
        "Adoption Operations",
        &[Action::AdoptPet, Action::AdoptedReport, Action::AvailableCount],
    ),
    ("", &[Action::Exit]),
];

pub fn render_menu() -> String {
    let mut out = String::from("\n=== PET ADOPTION SYSTEM ===\n");
    for (heading, actions) in SECTIONS {
        if heading.is_empty() {
            out.push_str("---------------------------\n");
        } else {
            out.push_str(&format!("\n-- {} --\n", heading));
        }
        for action in actions.iter() {
            out.push_str(&format!("{:>3}. {}\n", action.number(), action.label()));
        }
    }
    out
}

/// Title line followed by a bordered table. Underscores in headers read as
/// spaces.
pub fn render_table(table: &Table) -> String {
    let mut grid = comfy_table::Table::new();
    grid.load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    grid.set_header(
        table
            .columns
            .iter()
            .map(|c| Cell::new(c.replace('_', " "))),
    );

    if table.rows.is_empty() {
        grid.add_row(vec![Cell::new(EMPTY_TABLE)]);
    } else {
        for row in &table.rows {
            grid.add_row(row.iter().map(|v| Cell::new(v.to_string())));
        }
    }

    format!("{}\n{}\n", table.title, grid)
}

pub fn render_notice(notice: &Notice) -> String {
    format!("[{}] {}\n", notice.title, notice.message)
}

pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Notice(n) => render_notice(n),
        Outcome::Table(t) => render_table(t),
        Outcome::Closed => "Goodbye.\n".to_string(),
    }
}

async fn prompt<R, W>(reader: &mut R, writer: &mut W, text: &str) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.flush().await?;
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Runs the menu until Exit or end of input. The session is closed either way.
pub async fn run<R, W>(service: &ShelterService, mut reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        writer.write_all(render_menu().as_bytes()).await?;
        let prompt_text = format!("Select an option (1-{}): ", Action::ALL.len());
        let Some(choice) = prompt(&mut reader, &mut writer, &prompt_text).await? else {
            break;
        };

        let Some(action) = choice.trim().parse::<usize>().ok().and_then(Action::from_number) else {
            let notice = Notice::error(
                "Input Error",
                format!("Please choose a number between 1 and {}.", Action::ALL.len()),
            );
            writer.write_all(render_notice(&notice).as_bytes()).await?;
            continue;
        };

        let mut form = FormInput::new();
        let mut eof = false;
        for field in action.fields() {
            match prompt(&mut reader, &mut writer, &format!("{}: ", field.label)).await? {
                Some(value) => form.insert(field.key, value),
                None => {
                    eof = true;
                    break;
                }
            }
        }
        if eof {
            break;
        }

        if action == Action::DeletePet {
            let question = format!(
                "Are you sure you want to delete Pet ID {} and all related adoption records? (y/n): ",
                form.get("pet_id").trim()
            );
            let answer = prompt(&mut reader, &mut writer, &question).await?;
            let confirmed = matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes"));
            if !confirmed {
                writer.write_all(b"[Cancelled] Pet was not deleted.\n").await?;
                continue;
            }
        }

        let outcome = service.handle(action, &form).await;
        writer.write_all(render_outcome(&outcome).as_bytes()).await?;
        if matches!(outcome, Outcome::Closed) {
            writer.flush().await?;
            return Ok(());
        }
    }

    service.close().await;
    writer.flush().await?;
    Ok(())
}
