use evvm_core::{
    EvvmError,
    identity::IdentityKind,
    mocks::{RecordingCodeSender, ScriptedAuthenticator},
    verification::{
        Attestation, ClaimState, VerificationMethod,
        flow::{AttestationError, authenticate, request_code},
    },
};
use evvm_test_utils::{
    asserts::ResultAssertsExt,
    random::{TestRng, rng},
};
use rstest::rstest;

use crate::utils::{Env, VERIFIED_AT};

#[rstest]
#[case::email(IdentityKind::Email, "a@b.com")]
#[case::phone(IdentityKind::PhoneNumber, "+1 555 010 2030")]
#[case::username(IdentityKind::Username, "alice")]
#[tokio::test]
async fn out_of_band_code(mut rng: TestRng, #[case] kind: IdentityKind, #[case] value: &str) {
    let env = Env::new(&mut rng);
    let state = ClaimState::new(kind, value);

    let sent = request_code(&state, &env.code_sender, &mut rng)
        .await
        .unwrap();
    sent.submit_code("not-the-code", env.now())
        .assert_err_contains("does not match");

    let code = env.code_sender.last_code().unwrap();
    let verified = sent.submit_code(code.as_str(), env.now()).unwrap();
    let claim = verified.verified().unwrap();

    assert_eq!(claim.identity().as_str(), value);
    assert_eq!(claim.method(), VerificationMethod::OutOfBandCode);
    assert_eq!(claim.timestamp(), u64::try_from(VERIFIED_AT).unwrap());
}

#[rstest]
#[tokio::test]
async fn resend_issues_fresh_code(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let state = ClaimState::new(IdentityKind::Email, "a@b.com");

    let first = request_code(&state, &env.code_sender, &mut rng)
        .await
        .unwrap();
    let first_code = env.code_sender.last_code().unwrap();
    let second = request_code(&first, &env.code_sender, &mut rng)
        .await
        .unwrap();
    let second_code = env.code_sender.last_code().unwrap();

    assert_eq!(env.code_sender.deliveries(), 2);
    if first_code != second_code {
        assert!(matches!(
            second.submit_code(first_code.as_str(), env.now()),
            Err(EvvmError::CodeMismatch)
        ));
    }
    assert!(
        second
            .submit_code(second_code.as_str(), env.now())
            .unwrap()
            .is_verified()
    );
}

#[rstest]
#[tokio::test]
async fn transport_failure_is_recoverable(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let state = ClaimState::new(IdentityKind::PhoneNumber, "5550102030");

    let err = request_code(&state, &RecordingCodeSender::failing("sms gateway down"), &mut rng)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), evvm_core::ErrorKind::ExternalDependencyFailure);

    assert!(
        request_code(&state, &env.code_sender, &mut rng)
            .await
            .is_ok()
    );
}

#[rstest]
#[tokio::test]
async fn third_party_attestation(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let auth = ScriptedAuthenticator::new(Ok(Attestation {
        token: "did:ethr:token".into(),
        verified_identity: "A@B.COM".into(),
    }));

    let verified = authenticate(
        &ClaimState::new(IdentityKind::Email, "a@b.com"),
        &auth,
        env.now(),
    )
    .await
    .unwrap();

    assert_eq!(
        verified.verified().unwrap().method(),
        VerificationMethod::ThirdPartyAttestation
    );
}

#[rstest]
#[case::rate_limited(AttestationError::RateLimited, "rate limited")]
#[case::failed(AttestationError::Failed("link expired".into()), "link expired")]
#[case::already(AttestationError::AlreadyAuthenticated, "already authenticated")]
#[tokio::test]
async fn attestation_failures(
    mut rng: TestRng,
    #[case] error: AttestationError,
    #[case] message: &str,
) {
    let env = Env::new(&mut rng);
    let auth = ScriptedAuthenticator::new(Err(error));
    let state = ClaimState::new(IdentityKind::Email, "a@b.com");

    authenticate(&state, &auth, env.now())
        .await
        .assert_err_contains(message);
    assert_eq!(state, ClaimState::new(IdentityKind::Email, "a@b.com"));
}
