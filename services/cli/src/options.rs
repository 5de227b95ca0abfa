use crate::args::OutputFormat;
use crate::render::emit;
use clap::Args;
use nmt_advisor::admissions::ChanceCategory;
use nmt_advisor::error::AppError;
use nmt_advisor::scoring::features::{
    institution_type_labels, region_labels, settlement_type_labels,
};
use nmt_advisor::scoring::Subject;
use serde::Serialize;

#[derive(Args, Debug)]
pub(crate) struct OptionsArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub(crate) format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct KeyedLabel {
    key: &'static str,
    label: &'static str,
}

#[derive(Debug, Serialize)]
struct AcceptedOptions {
    subjects: Vec<KeyedLabel>,
    regions: Vec<&'static str>,
    settlement_types: Vec<&'static str>,
    institution_types: Vec<&'static str>,
    chance_categories: Vec<KeyedLabel>,
}

fn accepted_options() -> AcceptedOptions {
    AcceptedOptions {
        subjects: Subject::ordered()
            .into_iter()
            .map(|subject| KeyedLabel {
                key: subject.key(),
                label: subject.label(),
            })
            .collect(),
        regions: region_labels().collect(),
        settlement_types: settlement_type_labels().collect(),
        institution_types: institution_type_labels().collect(),
        chance_categories: ChanceCategory::ordered()
            .into_iter()
            .map(|category| KeyedLabel {
                key: category.key(),
                label: category.label(),
            })
            .collect(),
    }
}

pub(crate) fn run_options(args: OptionsArgs) -> Result<(), AppError> {
    let options = accepted_options();
    emit(args.format, &options, || render_options(&options))
}

fn render_options(options: &AcceptedOptions) {
    let keyed = |title: &str, values: &[KeyedLabel]| {
        println!("{title}:");
        for value in values {
            println!("  {:<20} {}", value.key, value.label);
        }
    };
    let plain = |title: &str, values: &[&str]| {
        println!("{title}:");
        for value in values {
            println!("  {value}");
        }
    };

    keyed("Subjects (--grade <key>=<grade>)", &options.subjects);
    plain("Regions (--region)", &options.regions);
    plain("Settlement types (--settlement-type)", &options.settlement_types);
    plain("School types (--institution-type)", &options.institution_types);
    keyed("Chance categories (--chance <key>)", &options.chance_categories);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_accepted_value() {
        let options = accepted_options();
        assert_eq!(options.subjects.len(), 3);
        assert_eq!(options.regions.len(), 25);
        assert_eq!(options.chance_categories.len(), 11);
        assert_eq!(options.chance_categories[0].key, "above_max");
    }
}
