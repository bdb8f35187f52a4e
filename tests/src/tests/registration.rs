use evvm_core::{
    Address, Bytes, EvvmError, Priority, U256,
    encoder::{Encoder, render_hex},
    identity::{Identity, IdentityKind},
    mocks::{FailingReward, ScriptedAuthenticator},
    registration::{RegistrationAction, RegistrationFields, RegistrationRequest},
    submission::SubmissionPayload,
    verification::{
        Attestation, ClaimState,
        flow::{authenticate, request_code},
    },
};
use evvm_crypto::SignedPayload;
use evvm_erc191::{Erc191Payload, SignedErc191Payload};
use evvm_test_utils::{
    random::{TestRng, rng},
    tamper::tamper_bytes,
};
use rstest::rstest;
use serde_json::json;

use crate::utils::{Env, NAME_SERVICE};

fn request() -> RegistrationRequest {
    RegistrationRequest {
        nonce: U256::from(5),
        priority_fee: U256::from(1),
        evvm_nonce: U256::from(42),
        ..RegistrationRequest::default()
    }
}

async fn verify_by_code(env: &Env, rng: &mut TestRng, kind: IdentityKind, value: &str) -> ClaimState {
    let sent = request_code(&ClaimState::new(kind, value), &env.code_sender, rng)
        .await
        .unwrap();
    let code = env.code_sender.last_code().unwrap();
    sent.submit_code(code.as_str(), env.now()).unwrap()
}

fn recover(message: String, signature: &Bytes) -> Option<Address> {
    SignedErc191Payload {
        payload: Erc191Payload::from(message),
        signature: signature.clone(),
    }
    .verify()
}

fn action_message(env: &Env, fields: &RegistrationFields, reward: U256) -> String {
    Encoder::new(env.config.evvm_id).registration(&RegistrationAction {
        service: NAME_SERVICE,
        identity: fields.identity().clone(),
        distinguishing_number: fields.distinguishing_number(),
        nonce: fields.nonce(),
        reward,
        priority_fee: fields.payment().fields().priority_fee,
        evvm_nonce: fields.payment().fields().nonce,
        priority: fields.payment().fields().priority,
    })
}

#[rstest]
#[tokio::test]
async fn email_registration_end_to_end(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let claim = verify_by_code(&env, &mut rng, IdentityKind::Email, "a@b.com").await;
    let composer = env.composer();

    let fields = composer
        .sign_registration_email(&claim, request())
        .await
        .unwrap();

    assert_eq!(composer.signer().calls(), 2);
    let payment = fields.payment();
    assert_eq!(payment.fields().amount, U256::from(1000));
    assert_eq!(
        recover(
            composer.encoder().pay(payment.fields()).unwrap(),
            payment.signature()
        ),
        Some(env.user.address())
    );
    assert_eq!(
        recover(
            action_message(&env, &fields, U256::from(10)),
            fields.signature_user()
        ),
        Some(env.user.address())
    );

    let value = serde_json::to_value(SubmissionPayload::from(fields.clone())).unwrap();
    let data = &value["EmailRegistrationInputData"];
    assert_eq!(data["email"], "a@b.com");
    assert_eq!(data["timestampUser"], "1700000000");
    assert_eq!(data["timestampAuthority"], "0");
    assert_eq!(data["signatureAuthority"], "0x");
    assert_eq!(data["signature_EVVM"], value["PayInputData"]["signature"]);
    assert_eq!(
        value["PayInputData"]["to_address"],
        json!(render_hex(NAME_SERVICE.as_slice()))
    );
}

#[rstest]
#[tokio::test]
async fn tampered_signature_does_not_recover_user(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let claim = verify_by_code(&env, &mut rng, IdentityKind::PhoneNumber, "5550102030").await;

    let fields = env
        .composer()
        .sign_registration_phone_number(&claim, request())
        .await
        .unwrap();

    let tampered = tamper_bytes(&mut rng, fields.signature_user(), false);
    assert_ne!(
        recover(
            action_message(&env, &fields, U256::from(10)),
            &tampered.into()
        ),
        Some(env.user.address())
    );
    assert_ne!(
        recover(
            action_message(&env, &fields, U256::from(11)),
            fields.signature_user()
        ),
        Some(env.user.address())
    );
}

#[rstest]
#[tokio::test]
async fn username_via_attestation(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let auth = ScriptedAuthenticator::new(Ok(Attestation {
        token: "did:ethr:token".into(),
        verified_identity: "alice".into(),
    }));
    let claim = authenticate(
        &ClaimState::new(IdentityKind::Username, "alice"),
        &auth,
        env.now(),
    )
    .await
    .unwrap();

    let fields = env
        .composer()
        .sign_registration_username(
            &claim,
            RegistrationRequest {
                distinguishing_number: U256::from(77),
                priority: Priority::High,
                ..request()
            },
        )
        .await
        .unwrap();

    let value = serde_json::to_value(SubmissionPayload::from(fields)).unwrap();
    let data = &value["UsernameRegistrationInputData"];
    assert_eq!(data["username"], "alice");
    assert_eq!(data["clowNumber"], "77");
    assert_eq!(data["priorityFlag_EVVM"], true);
    assert_eq!(value["PayInputData"]["priority"], true);
}

#[rstest]
#[tokio::test]
async fn reward_unavailable_prompts_nothing(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let claim = verify_by_code(&env, &mut rng, IdentityKind::Email, "a@b.com").await;
    let composer = env.composer_with(FailingReward);

    let err = composer
        .sign_registration_email(&claim, request())
        .await
        .unwrap_err();

    assert!(matches!(err, EvvmError::RewardUnavailable(_)));
    assert_eq!(composer.signer().calls(), 0);
}

#[rstest]
#[tokio::test]
async fn every_registration_kind_requires_verification(
    mut rng: TestRng,
    #[values(IdentityKind::Username, IdentityKind::Email, IdentityKind::PhoneNumber)]
    kind: IdentityKind,
) {
    let env = Env::new(&mut rng);
    let composer = env.composer();
    let claim = ClaimState::new(kind, "");

    let result = match kind {
        IdentityKind::Username => composer.sign_registration_username(&claim, request()).await,
        IdentityKind::Email => composer.sign_registration_email(&claim, request()).await,
        IdentityKind::PhoneNumber => {
            composer
                .sign_registration_phone_number(&claim, request())
                .await
        }
    };

    assert!(matches!(result, Err(EvvmError::PreconditionNotMet(_))));
    assert_eq!(composer.signer().calls(), 0);
}

#[rstest]
#[tokio::test]
async fn pre_registration_message_is_signable(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let identity = Identity::new(IdentityKind::Username, "alice").unwrap();
    let message = env
        .composer()
        .encoder()
        .pre_registration(&identity, U256::from(3), U256::from(9));

    let signed = env.user.sign_payload(message.clone().into()).unwrap();

    assert!(message.starts_with("1,preRegistrationUsername,0x"));
    assert_eq!(signed.verify(), Some(env.user.address()));
}
