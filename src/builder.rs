use std::fmt::Debug;

use reqwest::Client;
use url::Url;

use crate::Seedbox;

/// Typestate builder for [`Seedbox`].
pub struct SeedboxBuilder<R = (), E = ()> {
    client: R,
    endpoint: E,
}

impl SeedboxBuilder {
    /// Creates a new `SeedboxBuilder` with default values.
    pub fn new() -> Self {
        SeedboxBuilder {
            client: (),
            endpoint: (),
        }
    }
}

impl Default for SeedboxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, E> SeedboxBuilder<R, E> {
    /// Sets the HTTP client for the `Seedbox` instance.
    pub fn client(self, client: Client) -> SeedboxBuilder<Client, E> {
        SeedboxBuilder {
            client,
            endpoint: self.endpoint,
        }
    }

    /// Sets the base URL of the manager's HTTP API.
    pub fn endpoint<U>(self, endpoint: U) -> SeedboxBuilder<R, U>
    where
        U: TryInto<Url>,
    {
        SeedboxBuilder {
            client: self.client,
            endpoint,
        }
    }
}

impl<U> SeedboxBuilder<Client, U>
where
    U: TryInto<Url>,
    U::Error: Debug,
{
    /// Builds the `Seedbox` instance with the provided HTTP client.
    pub fn build(self) -> Seedbox {
        let endpoint = self.endpoint.try_into().expect("Invalid endpoint");
        Seedbox::new(endpoint, self.client)
    }
}

impl<U> SeedboxBuilder<(), U>
where
    U: TryInto<Url>,
    U::Error: Debug,
{
    /// Builds the `Seedbox` instance with a default HTTP client.
    pub fn build(self) -> Seedbox {
        self.client(Client::new()).build()
    }
}

#[test]
fn test_builder() {
    SeedboxBuilder::new()
        .client(Client::new())
        .endpoint("http://localhost:8080")
        .build();

    SeedboxBuilder::new().endpoint("http://localhost:8080").build();
}
