use crate::cmd::{load_models, ModelsArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_models, OutputFormat};

pub fn run(args: ModelsArgs, format: OutputFormat) -> CliResult<i32> {
    let models = load_models(args.models.as_deref())?;
    print_models(&models, format);
    Ok(SUCCESS)
}
