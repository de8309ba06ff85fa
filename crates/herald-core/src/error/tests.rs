use super::*;
use chrono::DateTime;

#[test]
fn test_configuration_suggests_gen_secret() {
    let error = Error::Token(TokenError::Configuration("signing secret is not set".to_string()));

    let msg = error.user_message();
    assert!(msg.contains("misconfigured"));
    assert!(msg.contains("signing secret is not set"));

    let suggestion = error.suggestion().unwrap();
    assert!(suggestion.contains("HERALD_TOKEN__SECRET"));
}

#[test]
fn test_expired_message_has_timestamp() {
    let expired_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let error = Error::Token(TokenError::Expired { expired_at });

    assert!(error.user_message().contains("2023-11-14"));
    assert!(error.suggestion().unwrap().contains("Log in again"));
}

#[test]
fn test_auth_token_errors_unwrap_to_token_message() {
    let error = Error::Auth(AuthError::Token(TokenError::InvalidSignature));
    assert!(error.user_message().contains("signature"));
    assert!(error.suggestion().is_some());
}

#[test]
fn test_format_error_for_cli() {
    let error = Error::Auth(AuthError::InvalidCredentials);

    let output = format_error_for_cli(&error);
    assert!(output.contains("Invalid credentials"));
    assert!(output.contains("username and password"));
}

#[test]
fn test_format_without_suggestion() {
    let error = Error::EventBus(EventBusError::Internal("Lock poisoned".to_string()));

    let output = format_error_for_cli(&error);
    assert!(output.contains("Lock poisoned"));
    assert!(!output.contains("\n\n"));
}
