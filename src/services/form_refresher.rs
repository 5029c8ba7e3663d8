//! Form Refresher: rewrites the form's choice lists
//!
//! The three choice fields (submitter, supporting tags, opposing tags) are
//! recomputed in full from the frequency tables' name columns on every
//! refresh; nothing is merged with the prior options. Each list always ends
//! with the free-text "other" option.

use crate::config::Locations;
use crate::error::{Error, Result};
use crate::services::forms_client::{choice_update_request, find_choice_item, GoogleFormsClient};
use crate::services::frequency::FrequencyTable;

pub async fn refresh_form(
    forms: &GoogleFormsClient,
    locations: &Locations,
    submitters: &FrequencyTable,
    supporting: &FrequencyTable,
    opposing: &FrequencyTable,
) -> Result<()> {
    let form = forms.get_form(&locations.form_id).await?;

    let fields = [
        (&locations.submitter_item_id, submitters),
        (&locations.supporting_item_id, supporting),
        (&locations.opposing_item_id, opposing),
    ];

    let mut requests = Vec::new();
    for (item_id, table) in fields {
        let (index, question_id) = find_choice_item(&form, item_id).ok_or_else(|| {
            Error::NotFound(format!("Choice item {} not found in form", item_id))
        })?;
        requests.push(choice_update_request(
            index,
            item_id,
            &question_id,
            &table.names(),
        ));
    }

    forms.batch_update(&locations.form_id, requests).await?;

    tracing::info!(
        submitters = submitters.names().len(),
        supporting = supporting.names().len(),
        opposing = opposing.names().len(),
        "Form choice lists refreshed"
    );

    Ok(())
}
