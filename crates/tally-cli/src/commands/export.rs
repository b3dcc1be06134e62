use std::path::Path;

use chrono::Utc;
use tally_core::export::{
    render_backup, render_participants_export, suggested_backup_file_name,
    suggested_export_file_name,
};

use crate::cli::ExportFormat;
use crate::commands::common::{write_output, Context};
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    context: &Context,
) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let now = Utc::now();
    let rendered = render_participants_export(board.store(), format.into(), now)?;

    write_output(
        &rendered,
        output_path,
        &suggested_export_file_name(format.into(), now),
    )
}

pub async fn run_backup(output_path: Option<&Path>, context: &Context) -> Result<(), CliError> {
    let board = context.open_board().await?;
    let now = Utc::now();
    let rendered = render_backup(board.store().participants(), board.is_dark_mode(), now)?;

    write_output(&rendered, output_path, &suggested_backup_file_name(now))
}
