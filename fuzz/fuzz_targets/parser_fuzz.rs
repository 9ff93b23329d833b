#![no_main]
use libfuzzer_sys::fuzz_target;

const SUBCOMMANDS: [&str; 5] = ["read", "deltas", "varints", "skip", "bytes"];

fuzz_target!(|data: &[u8]| {
    // First byte picks a subcommand so the fuzzer spends its time on flags.
    let Some((&pick, rest)) = data.split_first() else {
        return;
    };
    let text = String::from_utf8_lossy(rest);
    let args: Vec<String> = std::iter::once(SUBCOMMANDS[usize::from(pick) % SUBCOMMANDS.len()])
        .chain(text.split_whitespace().take(32))
        .map(str::to_string)
        .collect();
    storecursor::cli::fuzz_try_parse_args(&args);
});
