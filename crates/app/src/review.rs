use std::io::{self, BufRead, Write};

use ui::FlashcardKey;
use ui::FlashcardWidget;
use ui::vm::map_flashcard;

const HELP: &str = "[n] další  [p] předchozí  [Enter/mezera] otočit  [q] konec";

/// Terminal flashcard review. Reads one command per line until `q` or EOF.
pub fn run_review<R: BufRead, W: Write>(
    widget: &mut FlashcardWidget,
    input: R,
    out: &mut W,
) -> io::Result<()> {
    print_card(widget, out)?;
    if widget.session().is_none_or(|session| session.is_empty()) {
        return Ok(());
    }
    writeln!(out, "{HELP}")?;

    for line in input.lines() {
        let line = line?;
        let handled = match line.trim() {
            "q" => break,
            "n" => widget.next(),
            "p" => widget.previous(),
            "" if line.contains(' ') => widget.handle_key(FlashcardKey::Space),
            "" => widget.handle_key(FlashcardKey::Enter),
            _ => widget.handle_key(FlashcardKey::Other),
        };
        if handled {
            print_card(widget, out)?;
        } else {
            writeln!(out, "{HELP}")?;
        }
    }
    Ok(())
}

fn print_card<W: Write>(widget: &FlashcardWidget, out: &mut W) -> io::Result<()> {
    let Some(session) = widget.session() else {
        return writeln!(out, "Pro toto téma nejsou k dispozici žádné kartičky.");
    };
    let (Some(vm), Some(card)) = (map_flashcard(session), session.current()) else {
        return writeln!(out, "Pro toto téma nejsou k dispozici žádné kartičky.");
    };

    writeln!(out, "[{}] {}", vm.progress, vm.question)?;
    if vm.flipped {
        writeln!(out, "    {}", card.answer)?;
    }
    Ok(())
}
