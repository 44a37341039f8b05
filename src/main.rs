mod options;

use options::Options;
use structopt::StructOpt;

use qx_sim::Error;
use qx_sim::circuit::builder::load_program;
use qx_sim::fingerprint::Fingerprint;
use qx_sim::gate::library;
use qx_sim::result::format_complex;
use qx_sim::simulator::runner;

fn try_main(options: Options) -> Result<(), Error> {
    library::self_check()?;

    let source = std::fs::read_to_string(&options.input).map_err(|source| Error::Io {
        path: options.input.display().to_string(),
        source,
    })?;
    let program = load_program(&source)?;
    log::info!(
        "loaded {} circuits on {} qubits from {}",
        program.circuits.len(),
        program.num_qubits,
        options.input.display()
    );

    let mut outcome = runner::run(
        program.num_qubits,
        &program.circuits,
        options.shots,
        options.seed,
    )?;

    match options.top {
        Some(k) => {
            let fingerprint = Fingerprint::of(&mut outcome.final_state, k);
            for (basis_vector, amplitude) in fingerprint.iter() {
                println!(
                    "{} {}",
                    basis_vector.to_substring(program.num_qubits),
                    format_complex(&amplitude)
                );
            }
        }
        None => print!("{}", outcome.result),
    }

    if let Some(output) = options.output.as_ref() {
        let json = outcome.result.to_json()?;
        std::fs::write(output, json).map_err(|source| Error::Io {
            path: output.display().to_string(),
            source,
        })?;
        log::info!("results written to {}", output.display());
    }

    Ok(())
}

fn main() {
    env_logger::init();

    let options = Options::from_args();
    if let Err(err) = try_main(options) {
        log::error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
