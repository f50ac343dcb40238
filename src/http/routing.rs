use std::borrow::Cow;

use crate::model::id::ApplicationId;

macro_rules! api {
    ($e:expr) => {
        concat!("https://discord.com/api/v10", $e)
    };
    ($e:expr, $($rest:tt)*) => {
        format!(api!($e), $($rest)*)
    };
}

/// A macro for defining routes. Takes as input a list of route definitions, and generates a
/// definition for the `Route` enum and implements methods on it.
macro_rules! routes {
    ($lt:lifetime, {
        $(
            $name:ident $({ $($field_name:ident: $field_type:ty),* })?,
            $path:expr;
        )+
    }) => {
        #[derive(Clone, Copy, Debug)]
        pub enum Route<$lt> {
            $(
                $name $({ $($field_name: $field_type),* })?,
            )+
        }

        impl<$lt> Route<$lt> {
            #[must_use]
            pub fn path(self) -> Cow<'static, str> {
                match self {
                    $(
                        Self::$name $({ $($field_name),* })? => $path.into(),
                    )+
                }
            }
        }
    };
}

// This macro takes as input a list of route definitions, represented in the following way:
// 1. The first line defines an enum variant representing an endpoint.
// 2. The second line provides the url for that endpoint.
routes! ('a, {
    WebhookOriginalInteractionResponse { application_id: ApplicationId, token: &'a str },
    api!("/webhooks/{}/{}/messages/@original", application_id, token);

    Commands { application_id: ApplicationId },
    api!("/applications/{}/commands", application_id);
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_response_path() {
        let route = Route::WebhookOriginalInteractionResponse {
            application_id: ApplicationId::new(123),
            token: "abc",
        };
        assert_eq!(
            route.path(),
            "https://discord.com/api/v10/webhooks/123/abc/messages/@original"
        );
        assert_eq!(
            Route::Commands {
                application_id: ApplicationId::new(9)
            }
            .path(),
            "https://discord.com/api/v10/applications/9/commands"
        );
    }
}
