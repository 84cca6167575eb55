//! Synthetic WhatsApp export generator for stress testing chatprep.
//!
//! Usage: cargo run --features gen-test --bin gen_test -- [messages] [output] [seed]
//! Example: cargo run --features gen-test --bin gen_test -- 500000 heavy_chat.txt 7

use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const AUTHORS: &[&str] = &[
    "Alice",
    "Bob",
    "Gilfoyle",
    "Dinesh",
    "Иван",
    "村上",
    "محمد",
    "+1 (555) 010-2030",
    "🔥FireUser🔥",
    "Jean-Luc",
];

const EMOJIS: &[&str] = &[
    "😀", "😂", "🤣", "😍", "🤔", "🙄", "😱", "🤯", "💀", "🔥", "👍", "❤️", "👨‍👩‍👧‍👦", "🤷‍♀️",
];

const NOISE: &[&str] = &[
    "<Media omitted>",
    "image omitted",
    "This message was deleted",
    "https://example.com/watch?v=dQw4w9WgXcQ",
];

/// Every this many messages, the clock jumps far enough to start a new session.
const SESSION_EVERY: usize = 40;

fn main() {
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
    let output = args.get(2).map(|s| s.as_str()).unwrap_or("heavy_chat.txt");
    let seed: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("🧪 WhatsApp Export Generator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("   Messages: {}", count);
    println!("   Output:   {}", output);
    println!("   Seed:     {}", seed);
    println!();

    let file = File::create(output)?;
    let mut writer = BufWriter::with_capacity(1024 * 1024, file);
    let mut rng = StdRng::seed_from_u64(seed);

    let start = Instant::now();
    let mut bytes_written: usize = 0;
    let mut sessions = 1;
    let mut clock = NaiveDate::from_ymd_opt(2020, 1, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .unwrap_or_default();

    for i in 0..count {
        if i > 0 && i % SESSION_EVERY == 0 {
            clock += TimeDelta::hours(rng.gen_range(5..=72));
            sessions += 1;
        } else {
            clock += TimeDelta::seconds(rng.gen_range(0..=1_800));
        }

        let author = AUTHORS.choose(&mut rng).copied().unwrap_or("Alice");
        let body = generate_message(&mut rng, i);
        let line = format!("{} - {}: {}\n", header_datetime(&clock, &mut rng), author, body);

        bytes_written += line.len();
        writer.write_all(line.as_bytes())?;

        if (i + 1) % 10000 == 0 {
            let elapsed = start.elapsed().as_secs_f64();
            let mps = (i + 1) as f64 / elapsed;
            let mb = bytes_written as f64 / 1_000_000.0;
            eprint!(
                "\r   Generated {}/{} ({:.1} MB, {:.0} msg/s)",
                i + 1,
                count,
                mb,
                mps
            );
        }
    }

    writer.flush()?;

    let elapsed = start.elapsed();
    let mb = bytes_written as f64 / 1_000_000.0;

    println!("\n\n✅ Done!");
    println!("   Size:     {:.2} MB", mb);
    println!("   Sessions: ~{}", sessions);
    println!("   Time:     {:.2}s", elapsed.as_secs_f64());
    println!(
        "   Speed:    {:.0} msg/s",
        count as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}

/// US-style header datetime; newer exports put U+202F before the meridiem.
fn header_datetime(clock: &NaiveDateTime, rng: &mut impl Rng) -> String {
    let space = if rng.gen_bool(0.3) { '\u{202F}' } else { ' ' };
    format!(
        "{}, {}{space}{}",
        clock.format("%-m/%-d/%y"),
        clock.format("%-I:%M"),
        clock.format("%p")
    )
}

fn generate_message(rng: &mut impl Rng, index: usize) -> String {
    match index % 20 {
        0..=7 => format!("Normal message #{} with some text", index),

        // Bodies that look like headers but are not
        8 => format!("meeting at 6:30 - bring snacks: chips, dip #{}", index),
        9 => format!("ratio is 3/4 - or 1/2: who knows #{}", index),

        // Continuation lines
        10 => format!("Line one #{}\nline two\n\nline four after a blank", index),
        11 => format!("List:\n- eggs\n- milk\n- 2/3 cup flour #{}", index),

        12 => {
            let emojis: String = (0..20)
                .map(|_| EMOJIS.choose(rng).copied().unwrap_or("🙂"))
                .collect();
            format!("Emoji spam: {} #{}", emojis, index)
        }

        13 => format!("Кириллица: Привет мир! #{}", index),
        14 => format!("日本語: こんにちは #{}", index),

        // Dropped by the default filter
        15 | 16 => {
            let noise = NOISE.choose(rng).copied().unwrap_or("<Media omitted>");
            if rng.gen_bool(0.5) {
                format!("\u{200E}{noise}")
            } else {
                noise.to_string()
            }
        }

        // Kept: a URL with commentary
        17 => format!("look https://example.com/{} lol", index),

        18 => String::new(),

        // Long message
        _ => {
            let padding: String = std::iter::repeat_n('X', 10_000).collect();
            format!("Long message #{}: {}", index, padding)
        }
    }
}
