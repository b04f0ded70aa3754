use crate::args::TemplateArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::template::statement_template;
use crate::{utils, Result};

/// Writes a blank statement workbook to `args.out()`.
pub async fn template(args: &TemplateArgs) -> Result<Out<()>> {
    let bytes = statement_template().pub_result(ErrorType::Io)?;
    utils::write(args.out(), bytes)
        .await
        .pub_result(ErrorType::Io)?;
    Ok(format!("Wrote a statement template to {}", args.out().display()).into())
}
