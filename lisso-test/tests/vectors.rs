use libtest_mimic::{Arguments, Failed, Trial};
use lisso_core::key::SsoKey;
use lisso_core::rand_core::OsRng;
use lisso_test::{Bool, TestFile, read_test};
use lisso_v2::{Client, ErrorKind};
use serde::Deserialize;

fn main() {
    let mut args = Arguments::from_args();
    args.test_threads = Some(1);

    let mut tests = vec![];

    SsoTest::add_tests("v2.json", &mut tests);

    libtest_mimic::run(&args, tests).exit();
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
struct SsoTest {
    key: String,
    token: String,
    #[serde(flatten)]
    result: TestResult,
}

impl SsoTest {
    fn add_tests(file: &str, tests: &mut Vec<Trial>) {
        let test_file: TestFile<Self> = read_test(file);
        for test in test_file.tests {
            let name = format!("{}::{}", test_file.name, test.name);
            tests.push(Trial::test(name, || test.test_data.test()));
        }
    }

    fn test(self) -> Result<(), Failed> {
        let key = SsoKey::from_hex(&self.key).map_err(|e| e.to_string())?;

        match self.result {
            TestResult::Failure { record_fail, .. } => {
                let plaintext = lisso_v2::decode(&self.token, &key);
                if !record_fail {
                    return match plaintext {
                        Ok(_) => Err("decoding token should fail".into()),
                        Err(e) if e.kind() == ErrorKind::InvalidFormat => Ok(()),
                        Err(e) => Err(format!("unexpected error: {e}").into()),
                    };
                }

                plaintext.map_err(|e| format!("token should decrypt: {e}"))?;
                match client(&self.key).decode_auth_token(&self.token) {
                    Ok(_) => Err("parsing record should fail".into()),
                    Err(e) if e.kind() == ErrorKind::InvalidFormat => Ok(()),
                    Err(e) => Err(format!("unexpected error: {e}").into()),
                }
            }
            TestResult::Success { payload, record, .. } => {
                let plaintext = lisso_v2::decode(&self.token, &key).map_err(|e| e.to_string())?;
                assert_eq!(plaintext, payload);

                if let Some(expected) = record {
                    let record = client(&self.key)
                        .decode_auth_token(&self.token)
                        .map_err(|e| e.to_string())?;
                    assert_eq!(serde_json::to_value(&record).unwrap(), expected);
                }

                // our own encoding of the same payload must decode the same way
                let token = lisso_v2::encode(&payload, &key, &mut OsRng).unwrap();
                assert_eq!(lisso_v2::decode(&token, &key).unwrap(), payload);

                Ok(())
            }
        }
    }
}

fn client(key: &str) -> Client {
    Client::new("vectors", ".vectors.test", key, "").unwrap()
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum TestResult {
    #[serde(rename_all = "kebab-case")]
    Success {
        #[allow(dead_code)]
        expect_fail: Bool<false>,
        payload: String,
        #[serde(default)]
        record: Option<serde_json::Value>,
    },
    #[serde(rename_all = "kebab-case")]
    Failure {
        #[allow(dead_code)]
        expect_fail: Bool<true>,
        #[allow(dead_code)]
        payload: (),
        #[serde(default)]
        record_fail: bool,
    },
}
