//! dualvariant diagnostics
//!
//! Shows what this artifact was built with, what the live runtime asks for,
//! and which variant the facade binds to.
//!
//! Usage:
//!   dvinfo                    # probe the marker as configured
//!   dvinfo --marker modern    # act as a modern host (install the marker)
//!   dvinfo --marker 3         # modern host, marker revision 3
//!   dvinfo --marker off       # host that installs an inactive marker
//!   dvinfo --conformance      # also run the conformance suite on the binding
//!   dvinfo -v                 # debug logging, flushed per line
//!
//! Build the modern variant with:
//!   DUALVARIANT_MODERN=1 cargo run -p dvinfo --features modern
//!
//! Exit status is 1 when the facade cannot bind.

use std::process::ExitCode;

use dualvariant::{build_info, install_marker, ModernRuntimeMarker};
use dualvariant_core::kprint::{self, LogLevel};
use dualvariant_core::{conformance, dv_println, env_is_set};
use dualvariant_runtime::{DispatchConfig, MarkerSourceKind, MARKER_SOURCE_ENV};

const LINE: &str = "────────────────────────────────────────────────────────────";

fn section(name: &str) {
    println!("\n{}", LINE);
    println!("  {}", name);
    println!("{}", LINE);
}

struct Args {
    marker: Option<String>,
    conformance: bool,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        marker: None,
        conformance: false,
        verbose: false,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--marker" => {
                args.marker = Some(it.next().ok_or("--marker needs a value")?);
            }
            "--conformance" => args.conformance = true,
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => {
                return Err(
                    "usage: dvinfo [--marker modern|off|<revision>] [--conformance] [-v]".into(),
                )
            }
            other => return Err(format!("unknown argument {:?}", other)),
        }
    }
    Ok(args)
}

fn install(value: &str) -> Result<(), String> {
    let result = match value.to_ascii_lowercase().as_str() {
        "modern" | "on" => install_marker(ModernRuntimeMarker { revision: 0 }),
        "off" | "inactive" => install_marker(false),
        rev => {
            let revision = rev
                .parse::<u32>()
                .map_err(|_| format!("bad marker value {:?}", value))?;
            install_marker(ModernRuntimeMarker { revision })
        }
    };
    result.map_err(|e| e.to_string())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(a) => a,
        Err(msg) => {
            dv_println!("{}", msg);
            return ExitCode::from(2);
        }
    };

    if args.verbose {
        kprint::set_log_level(LogLevel::Debug);
        kprint::set_flush_enabled(true);
    }

    if let Some(value) = &args.marker {
        if let Err(msg) = install(value) {
            dv_println!("dvinfo: {}", msg);
            return ExitCode::from(2);
        }
    }

    section("Build");
    println!("  architecture flag    {}", dualvariant::build_flag());
    println!("  selected variant     {}", build_info::ARCHITECTURE);
    println!("  modern enabled       {}", build_info::MODERN_ENABLED);
    println!("  inclusion strategy   {}", build_info::INCLUSION);
    println!("  compiled variants    {}", build_info::COMPILED_VARIANTS.join(", "));
    println!("  source roots         {}", build_info::SOURCE_ROOTS.join(", "));

    section("Runtime");
    let config = DispatchConfig::from_env();
    let origin = if env_is_set(MARKER_SOURCE_ENV) { MARKER_SOURCE_ENV } else { "default" };
    println!("  marker source        {} ({})", config.marker_source, origin);
    if config.marker_source == MarkerSourceKind::Env {
        println!("  marker variable      {}", config.marker_env);
    }
    let probe = dualvariant::probe();
    println!("  marker               {}", probe.marker);
    println!("  detected             {}", probe.detected);
    println!("  requested variant    {}", probe.variant());

    section("Binding");
    let binding = match dualvariant::resolve() {
        Ok(b) => b,
        Err(e) => {
            println!("  FAILED: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("  active variant       {}", binding.active);
    println!("  component            {}", binding.name());
    println!("  requirement          {}", binding.descriptor.required_marker);

    if args.conformance {
        section("Conformance");
        match conformance::exercise(&**binding) {
            Ok(()) => println!("  PASS"),
            Err(failure) => {
                println!("  FAIL: {}", failure);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
