use clap::Parser;
use mediqr::clock::SystemClock;
use mediqr::error::{Error, QrError};
use mediqr::qr::QrServerClient;
use mediqr::{cli, log, store, Api, Args, Database, MediqrConfig, Session};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let config = match MediqrConfig::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration Error: {}", err);
            std::process::exit(exitcode::CONFIG);
        }
    };

    log::init(config.log.clone());

    let store = match store::open(&config.store) {
        Ok(store) => store,
        Err(err) => {
            error!(msg = "Could not open the data store", error = err.to_string());
            eprintln!("{err}");
            std::process::exit(exitcode::CANTCREAT);
        }
    };

    let decoder = match QrServerClient::new(&config.qr) {
        Ok(decoder) => decoder,
        Err(err) => {
            error!(msg = "Could not create the QR decoding client", error = err.to_string());
            std::process::exit(exitcode::CONFIG);
        }
    };

    let database = Database::open(store.clone(), Arc::new(SystemClock));
    let api = Api::new(database, &config.api);

    let mut session = Session::bootstrap(Arc::new(api.clone()), store).await;

    let code = match args.command {
        Some(command) => match cli::run(command, &mut session, &api, &decoder, &config.qr).await {
            Ok(()) => exitcode::OK,
            Err(err) => {
                eprintln!("{err}");
                exit_code(&err)
            }
        },
        None => {
            info!(msg = "MediQR", version = mediqr::VERSION);
            println!("MediQR {}. Run with --help to list commands.", mediqr::VERSION);
            exitcode::OK
        }
    };

    if let Err(err) = api.flush().await {
        error!(msg = "Could not flush the data store", error = err.to_string());
    }

    std::process::exit(code);
}

fn exit_code(err: &Error) -> exitcode::ExitCode {
    match err {
        Error::NotLoggedIn | Error::ReadOnlyRole { .. } => exitcode::NOPERM,
        Error::PatientNotFound { .. } => exitcode::DATAERR,
        Error::Qr(QrError::Unreachable(_)) => exitcode::UNAVAILABLE,
        Error::Qr(_) => exitcode::DATAERR,
        Error::Io(_) => exitcode::IOERR,
        Error::Config(_) => exitcode::CONFIG,
        Error::Serialization(_) | Error::Store(_) => exitcode::SOFTWARE,
    }
}
