use crate::config::FormFields;
use crate::domain::{Account, RawPhoneNumber, SendSms};

fn push_credentials(params: &mut Vec<(String, String)>, fields: &FormFields, account: &Account) {
    params.push((
        fields.username.clone(),
        account.username.as_str().to_owned(),
    ));
    params.push((
        fields.password.clone(),
        account.password.as_str().to_owned(),
    ));
}

fn push_provider(params: &mut Vec<(String, String)>, fields: &FormFields, account: &Account) {
    params.push((
        fields.provider.clone(),
        account.provider.as_str().to_owned(),
    ));
}

pub fn encode_send_form(
    fields: &FormFields,
    account: &Account,
    request: &SendSms,
) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_credentials(&mut params, fields, account);

    let recipients = request
        .recipients()
        .iter()
        .map(RawPhoneNumber::raw)
        .collect::<Vec<_>>()
        .join(",");
    params.push((fields.recipients.clone(), recipients));
    params.push((fields.text.clone(), request.text().as_str().to_owned()));
    if let Some(sender) = request.sender() {
        params.push((fields.sender.clone(), sender.as_str().to_owned()));
    }

    push_provider(&mut params, fields, account);
    params
}

pub fn encode_balance_form(fields: &FormFields, account: &Account) -> Vec<(String, String)> {
    let mut params = Vec::<(String, String)>::new();
    push_credentials(&mut params, fields, account);
    params.push((
        fields.balance_flag.clone(),
        fields.balance_flag_value.clone(),
    ));
    push_provider(&mut params, fields, account);
    params
}
