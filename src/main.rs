//! CLI for Chebyshev cryptosystem analysis

use anyhow::Result;
use cheva::attack::bergamo::ExponentRecovery;
use cheva::attack::{BergamoAttack, SolutionMethod};
use cheva::chebyshev::{eval_fast, eval_fast_counted, eval_naive_counted};
use cheva::cipher::{cos_fraction_of_pi, KeyPair};
use cheva::precision::{count_digits, parse_decimal};
use cheva::{Error, Precision};
use clap::{Parser, Subcommand};
use rug::{Float, Integer};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cheva")]
#[command(about = "Chebyshev-polynomial cryptosystem analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run the Bergamo exponent-recovery attack against a reference scenario
    Attack {
        #[arg(
            long,
            default_value = "20,97",
            value_delimiter = ',',
            help = "Working precisions in decimal digits"
        )]
        digits: Vec<u32>,

        #[arg(long, default_value = "5", help = "Theta numerator: x = cos(n*pi/d)")]
        numerator: u32,

        #[arg(long, default_value = "18", help = "Theta denominator: x = cos(n*pi/d)")]
        denominator: u32,

        #[arg(long, default_value = "106000", help = "Private exponent s")]
        secret: String,

        #[arg(long, default_value = "81500", help = "Ephemeral exponent r")]
        ephemeral: String,

        #[arg(long, default_value = "0.111111111", help = "Plaintext in (0, 1)")]
        plaintext: String,
    },
    /// Compare the fast and naive evaluators over growing exponents
    Bench {
        #[arg(long, default_value = "30", help = "Working precision in decimal digits")]
        digits: u32,

        #[arg(long, default_value = "100000", help = "Largest private exponent tried")]
        max_exponent: u64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(found_equivalent) => {
            if found_equivalent {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Attack {
            digits,
            numerator,
            denominator,
            secret,
            ephemeral,
            plaintext,
        } => {
            let secret: Integer = secret.parse()?;
            let ephemeral: Integer = ephemeral.parse()?;

            let mut runs = Vec::new();
            for d in digits {
                let ctx = Precision::digits(d);
                let x = cos_fraction_of_pi(numerator, denominator, ctx)?;
                let pair = KeyPair::generate(x, secret.clone(), ctx)?;
                let u = parse_decimal(&plaintext, ctx)?;
                let ciphertext = pair.public.encrypt(&u, &ephemeral, ctx)?;

                let run = match BergamoAttack.recover_exponent(
                    &pair.public.x,
                    &ciphertext.z0,
                    ctx,
                    Some(&ephemeral),
                ) {
                    Ok(recovery) => {
                        let mask = eval_fast(&pair.public.y, &recovery.exponent, ctx)?;
                        let unmasked = ctx.float(&ciphertext.z2 / &mask);
                        let error = ctx.float(&unmasked - &u).abs();
                        recovered_run(d, &recovery, &unmasked, &error, ctx)
                    }
                    Err(e @ Error::PrecisionInsufficient { .. }) => {
                        failed_run(d, "precision-insufficient", e)
                    }
                    Err(e @ Error::NoSolution { .. }) => failed_run(d, "no-solution", e),
                    Err(e) => return Err(e.into()),
                };
                runs.push(run);
            }

            let recovered = runs.iter().filter(|r| r.status == "recovered").count();
            let report = AttackReport {
                summary: SummaryOutput {
                    runs: runs.len(),
                    recovered,
                },
                runs,
            };
            println!("{}", format_attack_report(&report, cli.json)?);
            Ok(recovered > 0)
        }
        Command::Bench {
            digits,
            max_exponent,
        } => {
            let report = run_bench(digits, max_exponent)?;
            println!("{}", format_bench_report(&report, cli.json)?);
            Ok(false)
        }
    }
}

#[derive(Serialize)]
struct AttackReport {
    runs: Vec<RunOutput>,
    summary: SummaryOutput,
}

#[derive(Serialize)]
struct RunOutput {
    digits: u32,
    status: String,
    method: Option<String>,
    exponent: Option<String>,
    modulus_digits: Option<u32>,
    residual: Option<String>,
    plaintext: Option<String>,
    plaintext_error: Option<String>,
    reason: Option<String>,
}

#[derive(Serialize)]
struct SummaryOutput {
    runs: usize,
    recovered: usize,
}

fn recovered_run(
    digits: u32,
    recovery: &ExponentRecovery,
    unmasked: &Float,
    error: &Float,
    ctx: Precision,
) -> RunOutput {
    let method = match recovery.method {
        SolutionMethod::DirectInverse => "direct-inverse",
        SolutionMethod::BezoutReduction => "bezout-reduction",
    };
    RunOutput {
        digits,
        status: "recovered".to_string(),
        method: Some(method.to_string()),
        exponent: Some(recovery.exponent.to_string()),
        modulus_digits: Some(count_digits(&recovery.modulus)),
        residual: Some(recovery.residual.to_string_radix(10, Some(6))),
        plaintext: Some(unmasked.to_string_radix(10, Some(ctx.decimal_digits() as usize))),
        plaintext_error: Some(error.to_string_radix(10, Some(6))),
        reason: None,
    }
}

fn failed_run(digits: u32, status: &str, error: Error) -> RunOutput {
    RunOutput {
        digits,
        status: status.to_string(),
        method: None,
        exponent: None,
        modulus_digits: None,
        residual: None,
        plaintext: None,
        plaintext_error: None,
        reason: Some(error.to_string()),
    }
}

fn format_attack_report(report: &AttackReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut output = String::new();
    for run in &report.runs {
        output.push_str(&format!("Precision: {} digits\n", run.digits));
        output.push_str(&format!("  Status: {}\n", run.status));
        if let Some(method) = &run.method {
            output.push_str(&format!("  Method: {}\n", method));
        }
        if let Some(exponent) = &run.exponent {
            output.push_str(&format!("  Equivalent exponent: {}\n", exponent));
        }
        if let Some(n) = run.modulus_digits {
            output.push_str(&format!("  Congruence modulus: 10^{}\n", n.saturating_sub(1)));
        }
        if let Some(residual) = &run.residual {
            output.push_str(&format!("  Verification residual: {}\n", residual));
        }
        if let Some(plaintext) = &run.plaintext {
            output.push_str(&format!("  Recovered plaintext: {}\n", plaintext));
        }
        if let Some(error) = &run.plaintext_error {
            output.push_str(&format!("  Plaintext error: {}\n", error));
        }
        if let Some(reason) = &run.reason {
            output.push_str(&format!("  Reason: {}\n", reason));
        }
        output.push('\n');
    }
    output.push_str(&format!(
        "{} of {} precisions recovered an equivalent exponent\n",
        report.summary.recovered, report.summary.runs
    ));
    Ok(output)
}

#[derive(Serialize)]
struct BenchReport {
    digits: u32,
    rows: Vec<BenchRow>,
}

#[derive(Serialize)]
struct BenchRow {
    exponent: String,
    fast_operations: u64,
    naive_operations: u64,
    recovery_difference: String,
}

fn run_bench(digits: u32, max_exponent: u64) -> Result<BenchReport> {
    let ctx = Precision::digits(digits);
    let x = parse_decimal(&pattern_literal("1", digits), ctx)?;
    let u = parse_decimal(&pattern_literal("01", digits), ctx)?;

    let mut rows = Vec::new();
    let mut s = Integer::from(10);
    let max = Integer::from(max_exponent);
    while s <= max {
        let r = Integer::from(&s / 2u32);

        let y = eval_fast(&x, &s, ctx)?;
        let mut fast_ops = 0;
        let mut naive_ops = 0;
        let z0_fast = eval_fast_counted(&x, &r, ctx, &mut fast_ops)?;
        let z0_naive = eval_naive_counted(&x, &r, ctx, &mut naive_ops)?;

        let z1 = eval_fast(&y, &r, ctx)?;
        let z2 = ctx.float(&u * &z1);

        let mask_fast = eval_fast(&z0_fast, &s, ctx)?;
        let mask_naive = eval_fast(&z0_naive, &s, ctx)?;
        let recovered_fast = ctx.float(&z2 / &mask_fast);
        let recovered_naive = ctx.float(&z2 / &mask_naive);
        let difference = ctx.float(&recovered_fast - &recovered_naive).abs();

        rows.push(BenchRow {
            exponent: s.to_string(),
            fast_operations: fast_ops,
            naive_operations: naive_ops,
            recovery_difference: difference.to_string_radix(10, Some(6)),
        });
        s *= 10;
    }

    Ok(BenchReport { digits, rows })
}

/// Repeats `pattern` until the fractional literal reaches `digits` characters.
fn pattern_literal(pattern: &str, digits: u32) -> String {
    let mut body = String::new();
    while body.len() < digits as usize {
        body.push_str(pattern);
    }
    format!("0.{body}")
}

fn format_bench_report(report: &BenchReport, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }

    let mut output = String::new();
    output.push_str(&format!("Precision: {} digits\n\n", report.digits));
    for row in &report.rows {
        output.push_str(&format!("Exponent {}\n", row.exponent));
        output.push_str(&format!("  Fast operations: {}\n", row.fast_operations));
        output.push_str(&format!("  Naive operations: {}\n", row.naive_operations));
        output.push_str(&format!(
            "  Recovery difference: {}\n\n",
            row.recovery_difference
        ));
    }
    Ok(output)
}
