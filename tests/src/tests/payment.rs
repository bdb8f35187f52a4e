use evvm_core::{
    ErrorKind, EvvmError, Priority, U256,
    encoder::{hash_disperse_payment_users_to_pay, render_hex},
    form::{DisperseForm, DisperseRow, PayForm},
    random_async_nonce,
    submission::SubmissionPayload,
};
use evvm_crypto::SignedPayload;
use evvm_erc191::{Erc191Payload, SignedErc191Payload};
use evvm_test_utils::{
    asserts::ResultAssertsExt,
    random::{TestRng, rng},
};
use rstest::rstest;

use crate::utils::Env;

fn disperse_form(rows: &[(&str, &str, &str)]) -> DisperseForm {
    DisperseForm {
        rows: rows
            .iter()
            .map(|(amount, to_address, to_identity)| DisperseRow {
                amount: (*amount).to_owned(),
                to_address: (*to_address).to_owned(),
                to_identity: (*to_identity).to_owned(),
            })
            .collect(),
        token: "0x0000000000000000000000000000000000000001".into(),
        priority_fee: "0".into(),
        nonce: "4".into(),
        ..DisperseForm::default()
    }
}

const ADDR_A: &str = "0x5288690d2d1833ee058683055c968196e3a77bf2";

#[rstest]
#[tokio::test]
async fn pay_from_form(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let composer = env.composer();
    let form = PayForm {
        to_identity: "bob@x.com".into(),
        token: "0x0000000000000000000000000000000000000001".into(),
        amount: "250".into(),
        priority_fee: "2".into(),
        nonce: random_async_nonce(&mut rng).to_string(),
        priority: true,
        ..PayForm::default()
    };

    let signed = composer.sign_pay(form.parse().unwrap()).await.unwrap();

    let message = composer.encoder().pay(signed.fields()).unwrap();
    assert!(message.starts_with("1,pay,bob@x.com,"));
    assert!(message.contains(",250,2,"));
    assert!(message.ends_with(",true,0x0000000000000000000000000000000000000000"));
    let recovered = SignedErc191Payload {
        payload: Erc191Payload::from(message),
        signature: signed.signature().clone(),
    }
    .verify();
    assert_eq!(recovered, Some(env.user.address()));
    assert_eq!(signed.fields().priority, Priority::High);

    let value = serde_json::to_value(SubmissionPayload::from(signed)).unwrap();
    assert_eq!(value["PayInputData"]["to_identity"], "bob@x.com");
    assert_eq!(
        value["PayInputData"]["to_address"],
        "0x0000000000000000000000000000000000000000"
    );
}

#[rstest]
#[tokio::test]
async fn disperse_from_form(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let composer = env.composer();
    let form = disperse_form(&[("100", ADDR_A, ""), ("200", "", "bob@x.com")]);

    let signed = composer
        .sign_disperse_pay(form.parse().unwrap())
        .await
        .unwrap();

    assert_eq!(signed.amount(), U256::from(300));
    let messages = composer.signer().messages();
    assert!(messages[0].contains(&render_hex(hash_disperse_payment_users_to_pay(
        &signed.fields().entries
    ))));
    let value = serde_json::to_value(SubmissionPayload::from(signed)).unwrap();
    assert_eq!(value["DispersePayInputData"]["toData"][0]["to_address"], ADDR_A);
}

#[rstest]
#[tokio::test]
async fn reordered_batch_signs_differently(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let composer = env.composer();
    let rows = [("100", ADDR_A, ""), ("200", "", "bob@x.com")];
    let reversed = [rows[1], rows[0]];

    let forward = composer
        .sign_disperse_pay(disperse_form(&rows).parse().unwrap())
        .await
        .unwrap();
    let backward = composer
        .sign_disperse_pay(disperse_form(&reversed).parse().unwrap())
        .await
        .unwrap();

    assert_eq!(forward.amount(), backward.amount());
    assert_ne!(forward.signature(), backward.signature());
}

#[rstest]
#[case::both(&[("100", ADDR_A, "bob")], "exactly one")]
#[case::neither(&[("100", "", "")], "exactly one")]
#[case::bad_amount(&[("1e3", ADDR_A, "")], "invalid unsigned integer")]
fn malformed_rows(#[case] rows: &[(&str, &str, &str)], #[case] message: &str) {
    disperse_form(rows)
        .parse()
        .inspect_err(|err| assert_eq!(err.kind(), ErrorKind::MalformedInput))
        .assert_err_contains(message);
}

#[rstest]
#[tokio::test]
async fn overflowing_batch_is_rejected(mut rng: TestRng) {
    let env = Env::new(&mut rng);
    let composer = env.composer();
    let max = U256::MAX.to_string();
    let form = disperse_form(&[(max.as_str(), ADDR_A, ""), ("1", "", "bob")]);

    assert!(matches!(
        composer.sign_disperse_pay(form.parse().unwrap()).await,
        Err(EvvmError::AmountOverflow)
    ));
    assert_eq!(composer.signer().calls(), 0);
}
