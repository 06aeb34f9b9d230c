//! Contract declaration macro

/// Declare a contract and its proxy support
///
/// Expands to:
/// - the contract trait, each operation returning
///   [`InvocationResult`](crate::InvocationResult) of its declared type
/// - a marker type implementing [`Contract`](crate::Contract) with a
///   descriptor built once on first use
/// - [`Route`](crate::Route) from the marker to every implementer, used by
///   the default delegation
/// - the trait itself for [`Proxy<Marker, H>`](crate::Proxy), forwarding
///   each call to the handler
///
/// Parameter and return types must implement
/// [`ContractValue`](crate::ContractValue). Supertraits are restricted to
/// plain names such as `Send + Sync`.
///
/// # Example
///
/// ```rust
/// use interpose_proxy::contract;
///
/// contract! {
///     /// Marker for [`Greeter`]
///     pub struct GreeterContract;
///
///     /// Something that greets
///     pub trait Greeter: Send + Sync {
///         fn greet(&self, name: String) -> String;
///         fn reset(&self);
///     }
/// }
/// ```
#[macro_export]
macro_rules! contract {
    (
        $(#[$marker_meta:meta])*
        $marker_vis:vis struct $marker:ident;

        $(#[$meta:meta])*
        $vis:vis trait $name:ident $(: $bound:ident $(+ $more:ident)*)? {
            $(
                $(#[$op_meta:meta])*
                fn $op:ident(&self $(, $arg:ident : $arg_ty:ty)* $(,)?) $(-> $ret:ty)?;
            )*
        }
    ) => {
        $(#[$marker_meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $marker_vis struct $marker;

        $(#[$meta])*
        $vis trait $name $(: $bound $(+ $more)*)? {
            $(
                $(#[$op_meta])*
                fn $op(&self $(, $arg: $arg_ty)*)
                    -> $crate::InvocationResult<$crate::__return_type!($($ret)?)>;
            )*
        }

        impl $crate::Contract for $marker {
            fn descriptor() -> &'static $crate::ContractDescriptor {
                static DESCRIPTOR: $crate::__private::OnceCell<$crate::ContractDescriptor> =
                    $crate::__private::OnceCell::new();

                DESCRIPTOR.get_or_init(|| {
                    $crate::ContractDescriptor::new(::core::stringify!($name))
                        $(
                            .operation(
                                $crate::OperationSignature::new(::core::stringify!($op))
                                    $(
                                        .param(
                                            ::core::stringify!($arg),
                                            <$arg_ty as $crate::ContractValue>::value_type(),
                                        )
                                    )*
                                    .returns(<
                                        $crate::__return_type!($($ret)?)
                                        as $crate::ContractValue
                                    >::value_type()),
                            )
                        )*
                })
            }
        }

        impl<T: $name + ?Sized> $crate::Route<T> for $marker {
            #[allow(unused_mut, unused_variables)]
            fn route(
                target: &T,
                invocation: &$crate::Invocation,
            ) -> $crate::InvocationResult<$crate::Value> {
                let mut args = invocation.reader();
                $(
                    if invocation.is(::core::stringify!($op)) {
                        $(
                            let $arg: $arg_ty = args.read(::core::stringify!($arg))?;
                        )*
                        return <T as $name>::$op(target $(, $arg)*)
                            .map($crate::ContractValue::into_value);
                    }
                )*
                Err($crate::InvocationError::unknown_operation(
                    ::core::stringify!($name),
                    invocation.operation(),
                ))
            }
        }

        impl<H> $name for $crate::Proxy<$marker, H>
        where
            H: $crate::InvocationHandler + ?Sized,
            $crate::Proxy<$marker, H>: $($bound $(+ $more)*)?,
        {
            $(
                fn $op(&self $(, $arg: $arg_ty)*)
                    -> $crate::InvocationResult<$crate::__return_type!($($ret)?)>
                {
                    $crate::Proxy::<$marker, H>::call(
                        self,
                        $crate::Invocation::new(
                            ::core::stringify!($op),
                            ::std::vec![$($crate::ContractValue::into_value($arg)),*],
                        ),
                    )
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __return_type {
    () => { () };
    ($ret:ty) => { $ret };
}
